// src/nlu/types.rs
// Structured views over the NLU collaborator's JSON output, with lenient
// coercion: missing or malformed fields degrade to empty, never to errors.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::dialogue::Eligibility;
use crate::products::ProductType;

/// Clarifying question used whenever type classification cannot be trusted.
pub const FALLBACK_TYPE_QUESTION: &str =
    "Are you looking to save up money, or to borrow? A few words about your goal would help.";

/// Facts pulled from one user message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFacts {
    pub slots: BTreeMap<String, i64>,
    pub eligibility: BTreeMap<String, Eligibility>,
    pub user_uncertain: bool,
}

impl ExtractedFacts {
    /// Coerce a salvaged JSON object. Unknown eligibility values and
    /// non-numeric slot values are dropped field by field.
    pub fn from_value(value: &Value) -> Self {
        let mut facts = ExtractedFacts::default();

        if let Some(slots) = value.get("slots").and_then(Value::as_object) {
            for (name, raw) in slots {
                if let Some(n) = coerce_i64(raw) {
                    facts.slots.insert(name.clone(), n);
                }
            }
        }

        if let Some(elig) = value.get("eligibility").and_then(Value::as_object) {
            for (key, raw) in elig {
                if let Some(answer) = raw.as_str().and_then(Eligibility::parse) {
                    facts.eligibility.insert(key.clone(), answer);
                }
            }
        }

        facts.user_uncertain = value
            .get("meta")
            .and_then(|m| m.get("user_uncertain"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        facts
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        return Some(f.round() as i64);
    }
    let s = value.as_str()?.trim().replace(',', "");
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    s.parse::<f64>().ok().map(|f| f.round() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAction {
    Ask,
    Proceed,
}

/// Outcome of the type-classification call.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecision {
    pub action: GuideAction,
    pub product_type: Option<ProductType>,
    pub question: String,
}

impl TypeDecision {
    /// Safe default: re-ask with the fallback clarifying question.
    pub fn fallback_ask() -> Self {
        Self {
            action: GuideAction::Ask,
            product_type: None,
            question: FALLBACK_TYPE_QUESTION.to_string(),
        }
    }

    /// Coerce a salvaged classification object. `proceed` is only honored
    /// with a valid product type; everything else (unknown action, missing
    /// or out-of-enum type) collapses to a re-ask rather than an error.
    pub fn from_value(value: &Value) -> Self {
        let action = value.get("action").and_then(Value::as_str).unwrap_or("");
        let product_type = value
            .get("product_type")
            .and_then(Value::as_str)
            .and_then(ProductType::parse);

        match (action, product_type) {
            ("proceed", Some(pt)) => Self {
                action: GuideAction::Proceed,
                product_type: Some(pt),
                question: String::new(),
            },
            _ => {
                let question = value
                    .get("question")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .unwrap_or(FALLBACK_TYPE_QUESTION)
                    .to_string();
                Self {
                    action: GuideAction::Ask,
                    product_type: None,
                    question,
                }
            }
        }
    }
}
