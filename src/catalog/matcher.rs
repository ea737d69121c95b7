// src/catalog/matcher.rs
// Literal-substring matching of catalog patterns against free text.

use super::types::ConditionCatalog;

/// Character budget for the raw-text fallback in [`summarize_condition`].
const SUMMARY_CHAR_BUDGET: usize = 80;

/// Find which catalog keys are textually present in `text`.
///
/// Keys come back in catalog order, each at most once. Within one entry the
/// first matching pattern wins; later patterns are never tested once one hits.
/// Pure function: no side effects, identical inputs give identical output.
pub fn find_keys(text: &str, catalog: &ConditionCatalog) -> Vec<String> {
    let mut found = Vec::new();
    for entry in catalog.iter() {
        for pattern in &entry.patterns {
            if !pattern.is_empty() && text.contains(pattern.as_str()) {
                found.push(entry.key.clone());
                break;
            }
        }
    }
    found
}

/// Short human-readable label for one candidate's raw condition text.
///
/// Prefers matched catalog keys (up to two, "+N more" beyond that); falls
/// back to the first sentence or clause of the raw text, hard-truncated.
pub fn summarize_condition(raw: &str, catalog: &ConditionCatalog) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "No bonus conditions listed".to_string();
    }

    let keys = find_keys(raw, catalog);
    if !keys.is_empty() {
        let labels: Vec<String> = keys.iter().take(2).map(|k| humanize_key(k)).collect();
        let mut short = labels.join(", ");
        if keys.len() > 2 {
            short.push_str(&format!(" +{} more", keys.len() - 2));
        }
        return format!("Key bonus conditions: {}", short);
    }

    let first = raw
        .split(['\n', '.'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if first.is_empty() {
        return "Bonus conditions apply".to_string();
    }
    truncate_chars(&first, SUMMARY_CHAR_BUDGET)
}

fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}

fn truncate_chars(s: &str, budget: usize) -> String {
    if s.chars().count() <= budget {
        return s.to_string();
    }
    let mut out: String = s.chars().take(budget).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::ConditionEntry;

    fn catalog() -> ConditionCatalog {
        ConditionCatalog::new(vec![
            ConditionEntry {
                key: "salary_transfer".into(),
                patterns: vec!["salary transfer".into(), "payroll".into()],
                question: "Can you route your salary here?".into(),
                explain: String::new(),
            },
            ConditionEntry {
                key: "card_spend".into(),
                patterns: vec!["card spend".into(), "credit card".into()],
                question: "Can you hit a card spend target?".into(),
                explain: String::new(),
            },
            ConditionEntry {
                key: "non_face".into(),
                patterns: vec!["mobile app".into(), "online".into()],
                question: "Is app sign-up okay?".into(),
                explain: String::new(),
            },
        ])
    }

    #[test]
    fn keys_come_back_in_catalog_order_once_each() {
        let text = "Bonus for online sign-up, payroll required, payroll again, credit card use";
        let keys = find_keys(text, &catalog());
        assert_eq!(keys, vec!["salary_transfer", "card_spend", "non_face"]);
    }

    #[test]
    fn matching_is_idempotent() {
        let text = "payroll and mobile app";
        let first = find_keys(text, &catalog());
        let second = find_keys(text, &catalog());
        assert_eq!(first, second);
    }

    #[test]
    fn no_match_on_unrelated_text() {
        assert!(find_keys("standard terms apply", &catalog()).is_empty());
    }

    #[test]
    fn summary_prefers_matched_keys_and_truncates_the_tail() {
        let text = "payroll, credit card, online bonus stack";
        let s = summarize_condition(text, &catalog());
        assert_eq!(
            s,
            "Key bonus conditions: salary transfer, card spend +1 more"
        );
    }

    #[test]
    fn summary_falls_back_to_first_clause() {
        let text = "Sign up during the promotion window. Further terms inside.";
        let s = summarize_condition(text, &catalog());
        assert_eq!(s, "Sign up during the promotion window");
    }

    #[test]
    fn summary_hard_truncates_long_fallback() {
        let text = "x".repeat(200);
        let s = summarize_condition(&text, &catalog());
        assert_eq!(s.chars().count(), 81);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn summary_handles_empty_raw() {
        assert_eq!(
            summarize_condition("  ", &catalog()),
            "No bonus conditions listed"
        );
    }
}
