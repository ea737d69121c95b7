// src/catalog/validate.rs
// Validation gate between the offline curator and the active catalog.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::{ConditionCatalog, ConditionEntry};

static KEY_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]{3,40}$").expect("key regex"));

/// Patterns too generic to identify a concrete eligibility criterion.
/// A pattern equal to one of these matches half the catalog's raw text and
/// would make its key fire on everything.
const GENERIC_PATTERNS: &[&str] = &[
    "bonus",
    "bonus rate",
    "extra rate",
    "rate",
    "interest",
    "condition",
    "conditions",
    "apply",
    "applies",
    "eligible",
    "sign up",
    "signup",
    "join",
];

/// Gate thresholds. Defaults mirror the curator contract: short reusable
/// patterns, a yes/no-answerable question, and a confidence floor below
/// which proposals are dropped instead of admitted.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    pub min_confidence: f64,
    pub min_patterns: usize,
    pub max_patterns: usize,
    pub min_pattern_chars: usize,
    pub max_pattern_chars: usize,
    pub min_question_chars: usize,
    pub max_question_chars: usize,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.78,
            min_patterns: 2,
            max_patterns: 8,
            min_pattern_chars: 2,
            max_pattern_chars: 24,
            min_question_chars: 10,
            max_question_chars: 120,
        }
    }
}

/// A curator proposal, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposedEntry {
    pub key: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub explain: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("confidence below admission floor")]
    LowConfidence,
    #[error("key '{0}' is not lowercase snake_case of 3..=40 chars")]
    BadKey(String),
    #[error("key '{0}' already exists")]
    DuplicateKey(String),
    #[error("too few usable patterns after cleaning")]
    TooFewPatterns,
    #[error("question length out of range")]
    BadQuestion,
    #[error("pattern set duplicates existing entry '{0}'")]
    DuplicatePatternSet(String),
}

/// Normalize a proposed key into lowercase snake_case.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_underscore = true;
    for ch in raw.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_underscore = false;
        } else if !last_underscore {
            out.push('_');
            last_underscore = true;
        }
    }
    out.trim_matches('_').to_string()
}

fn is_generic_pattern(pattern: &str) -> bool {
    GENERIC_PATTERNS.contains(&pattern.to_lowercase().as_str())
}

/// Order-insensitive fingerprint of a pattern set, used to reject proposals
/// that duplicate an existing entry under a different key.
pub(crate) fn pattern_set_hash(patterns: &[String]) -> String {
    let mut sorted: Vec<&str> = patterns.iter().map(|p| p.as_str()).collect();
    sorted.sort_unstable();
    let mut hasher = Sha256::new();
    hasher.update(sorted.join("|").as_bytes());
    let digest = hasher.finalize();
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

/// Validate one curator proposal against the active catalog.
///
/// On success, returns the cleaned entry ready for insertion. Order of
/// checks: confidence, key shape, key collision, patterns, question,
/// pattern-set collision.
pub fn validate_proposed(
    proposed: &ProposedEntry,
    existing: &ConditionCatalog,
    policy: &GatePolicy,
) -> Result<ConditionEntry, GateError> {
    if proposed.confidence < policy.min_confidence {
        return Err(GateError::LowConfidence);
    }

    let key = normalize_key(&proposed.key);
    if !KEY_SHAPE.is_match(&key) {
        return Err(GateError::BadKey(proposed.key.clone()));
    }
    if existing.contains_key(&key) {
        return Err(GateError::DuplicateKey(key));
    }

    let mut cleaned: Vec<String> = Vec::new();
    for raw in &proposed.patterns {
        let p = raw.trim();
        if p.is_empty() {
            continue;
        }
        let chars = p.chars().count();
        if chars < policy.min_pattern_chars || chars > policy.max_pattern_chars {
            continue;
        }
        if is_generic_pattern(p) {
            continue;
        }
        if cleaned.iter().any(|c| c == p) {
            continue;
        }
        cleaned.push(p.to_string());
    }
    if cleaned.len() < policy.min_patterns {
        return Err(GateError::TooFewPatterns);
    }
    cleaned.truncate(policy.max_patterns);

    let question = proposed.question.trim().to_string();
    let qlen = question.chars().count();
    if qlen < policy.min_question_chars || qlen > policy.max_question_chars {
        return Err(GateError::BadQuestion);
    }

    let fingerprint = pattern_set_hash(&cleaned);
    for entry in existing.iter() {
        if pattern_set_hash(&entry.patterns) == fingerprint {
            return Err(GateError::DuplicatePatternSet(entry.key.clone()));
        }
    }

    Ok(ConditionEntry {
        key,
        patterns: cleaned,
        question,
        explain: proposed.explain.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> ConditionCatalog {
        ConditionCatalog::new(vec![ConditionEntry {
            key: "salary_transfer".into(),
            patterns: vec!["salary transfer".into(), "payroll".into()],
            question: "Can you route your salary here? (yes/no/not sure)".into(),
            explain: String::new(),
        }])
    }

    fn proposal() -> ProposedEntry {
        ProposedEntry {
            key: "first_account".into(),
            patterns: vec!["first account".into(), "new customer".into()],
            question: "Would this be your first account with the bank? (yes/no/not sure)".into(),
            explain: String::new(),
            confidence: 0.9,
        }
    }

    #[test]
    fn admits_a_clean_proposal() {
        let entry = validate_proposed(&proposal(), &existing(), &GatePolicy::default()).unwrap();
        assert_eq!(entry.key, "first_account");
        assert_eq!(entry.patterns.len(), 2);
    }

    #[test]
    fn rejects_low_confidence() {
        let mut p = proposal();
        p.confidence = 0.5;
        assert_eq!(
            validate_proposed(&p, &existing(), &GatePolicy::default()),
            Err(GateError::LowConfidence)
        );
    }

    #[test]
    fn normalizes_key_then_checks_shape() {
        let mut p = proposal();
        p.key = "First Account!".into();
        let entry = validate_proposed(&p, &existing(), &GatePolicy::default()).unwrap();
        assert_eq!(entry.key, "first_account");

        p.key = "ab".into();
        assert!(matches!(
            validate_proposed(&p, &existing(), &GatePolicy::default()),
            Err(GateError::BadKey(_))
        ));
    }

    #[test]
    fn rejects_key_collisions() {
        let mut p = proposal();
        p.key = "salary_transfer".into();
        assert_eq!(
            validate_proposed(&p, &existing(), &GatePolicy::default()),
            Err(GateError::DuplicateKey("salary_transfer".into()))
        );
    }

    #[test]
    fn drops_generic_and_oversized_patterns() {
        let mut p = proposal();
        p.patterns = vec![
            "bonus".into(),
            "x".into(),
            "a pattern far too long to be a reusable keyword".into(),
            "first account".into(),
        ];
        assert_eq!(
            validate_proposed(&p, &existing(), &GatePolicy::default()),
            Err(GateError::TooFewPatterns)
        );
    }

    #[test]
    fn rejects_duplicate_pattern_sets_regardless_of_order() {
        let mut p = proposal();
        p.patterns = vec!["payroll".into(), "salary transfer".into()];
        assert_eq!(
            validate_proposed(&p, &existing(), &GatePolicy::default()),
            Err(GateError::DuplicatePatternSet("salary_transfer".into()))
        );
    }

    #[test]
    fn rejects_question_length_out_of_range() {
        let mut p = proposal();
        p.question = "Too short".into();
        assert_eq!(
            validate_proposed(&p, &existing(), &GatePolicy::default()),
            Err(GateError::BadQuestion)
        );
    }
}
