// src/dialogue/scoring.rs
// Heuristic utility scoring of candidates against eligibility answers.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::Eligibility;
use crate::catalog::{ConditionCatalog, find_keys};
use crate::products::{Candidate, ProductType, dedupe_candidates};

/// Scoring knobs. The numeric values are empirical tuning, kept configurable
/// on purpose; nothing downstream should assume their exact magnitudes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Added per matched condition the user answered "yes" to.
    pub yes_bonus: f64,
    /// Subtracted per matched condition the user answered "no" to.
    pub no_penalty: f64,
    /// Flat penalty once a candidate's matched-condition count reaches
    /// `complexity_threshold`: products that demand many simultaneous
    /// conditions rarely pay out their headline rate.
    pub complexity_penalty: f64,
    pub complexity_threshold: usize,
    /// Final list length.
    pub top_k: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            yes_bonus: 0.15,
            no_penalty: 0.10,
            complexity_penalty: 0.10,
            complexity_threshold: 4,
            top_k: 3,
        }
    }
}

/// Score one candidate.
///
/// Base is the representative rate, sign-flipped for loans so that "higher
/// score = better" holds uniformly. Deterministic: same inputs, same score.
pub fn score_candidate(
    product_type: ProductType,
    candidate: &Candidate,
    eligibility: &BTreeMap<String, Eligibility>,
    catalog: &ConditionCatalog,
    weights: &ScoringWeights,
) -> f64 {
    let base = if product_type.is_loan() {
        -candidate.rate
    } else {
        candidate.rate
    };

    let keys = find_keys(&candidate.condition_raw, catalog);

    let mut adjustment = 0.0;
    for key in &keys {
        match eligibility.get(key) {
            Some(Eligibility::Yes) => adjustment += weights.yes_bonus,
            Some(Eligibility::No) => adjustment -= weights.no_penalty,
            Some(Eligibility::Unknown) | None => {}
        }
    }

    if keys.len() >= weights.complexity_threshold {
        adjustment -= weights.complexity_penalty;
    }

    base + adjustment
}

/// Rank candidates by descending score and truncate.
///
/// The sort is stable, so equal scores keep pool order; de-duplication runs
/// before truncation so a duplicate never crowds a distinct product out of
/// the final list.
pub fn rank_candidates(
    product_type: ProductType,
    candidates: &[Candidate],
    eligibility: &BTreeMap<String, Eligibility>,
    catalog: &ConditionCatalog,
    weights: &ScoringWeights,
) -> Vec<Candidate> {
    let mut scored: Vec<(f64, &Candidate)> = candidates
        .iter()
        .map(|c| {
            (
                score_candidate(product_type, c, eligibility, catalog, weights),
                c,
            )
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let ranked: Vec<Candidate> = scored.into_iter().map(|(_, c)| c.clone()).collect();
    let mut deduped = dedupe_candidates(ranked);
    deduped.truncate(weights.top_k);
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ConditionEntry;

    fn catalog() -> ConditionCatalog {
        let entry = |key: &str, pattern: &str| ConditionEntry {
            key: key.into(),
            patterns: vec![pattern.into()],
            question: format!("{key}? (yes/no/not sure)"),
            explain: String::new(),
        };
        ConditionCatalog::new(vec![
            entry("salary_transfer", "payroll"),
            entry("auto_transfer", "auto transfer"),
            entry("card_spend", "credit card"),
            entry("non_face", "mobile app"),
            entry("youth", "youth"),
        ])
    }

    fn candidate(id: &str, rate: f64, condition_raw: &str) -> Candidate {
        Candidate {
            id: id.into(),
            provider: "Alpha Bank".into(),
            name: format!("{id} product"),
            rate,
            condition_raw: condition_raw.into(),
        }
    }

    fn yes(keys: &[&str]) -> BTreeMap<String, Eligibility> {
        keys.iter()
            .map(|k| (k.to_string(), Eligibility::Yes))
            .collect()
    }

    #[test]
    fn scoring_is_deterministic() {
        let c = candidate("p1", 3.5, "payroll and credit card");
        let elig = yes(&["salary_transfer"]);
        let w = ScoringWeights::default();
        let s1 = score_candidate(ProductType::Savings, &c, &elig, &catalog(), &w);
        let s2 = score_candidate(ProductType::Savings, &c, &elig, &catalog(), &w);
        assert_eq!(s1, s2);
    }

    #[test]
    fn yes_answers_raise_and_no_answers_lower() {
        let c = candidate("p1", 3.0, "payroll");
        let w = ScoringWeights::default();
        let none = BTreeMap::new();
        let base = score_candidate(ProductType::Savings, &c, &none, &catalog(), &w);

        let with_yes = score_candidate(
            ProductType::Savings,
            &c,
            &yes(&["salary_transfer"]),
            &catalog(),
            &w,
        );
        assert!(with_yes > base);

        let mut no = BTreeMap::new();
        no.insert("salary_transfer".to_string(), Eligibility::No);
        let with_no = score_candidate(ProductType::Savings, &c, &no, &catalog(), &w);
        assert!(with_no < base);
    }

    #[test]
    fn flipping_no_to_yes_never_decreases_score() {
        let c = candidate("p1", 3.0, "payroll, credit card, mobile app");
        let w = ScoringWeights::default();
        let mut elig = yes(&["card_spend"]);
        elig.insert("salary_transfer".to_string(), Eligibility::No);
        let before = score_candidate(ProductType::Savings, &c, &elig, &catalog(), &w);

        elig.insert("salary_transfer".to_string(), Eligibility::Yes);
        let after = score_candidate(ProductType::Savings, &c, &elig, &catalog(), &w);
        assert!(after >= before);
    }

    #[test]
    fn loan_rates_rank_lowest_first() {
        let cheap = candidate("cheap", 4.2, "");
        let pricey = candidate("pricey", 6.8, "");
        let ranked = rank_candidates(
            ProductType::CreditLoan,
            &[pricey.clone(), cheap.clone()],
            &BTreeMap::new(),
            &catalog(),
            &ScoringWeights::default(),
        );
        assert_eq!(ranked[0], cheap);
        assert_eq!(ranked[1], pricey);
    }

    #[test]
    fn many_condition_product_loses_to_simple_one_at_equal_rate() {
        // Five matched keys, all yes: bonus is eaten back by the complexity
        // penalty, so the two-key product at the same rate wins.
        let busy = candidate(
            "busy",
            3.0,
            "payroll, auto transfer, credit card, mobile app, youth",
        );
        let simple = candidate("simple", 3.0, "payroll, credit card");
        let elig = yes(&[
            "salary_transfer",
            "auto_transfer",
            "card_spend",
            "non_face",
            "youth",
        ]);
        let w = ScoringWeights::default();

        let busy_score = score_candidate(ProductType::Savings, &busy, &elig, &catalog(), &w);
        let simple_score = score_candidate(ProductType::Savings, &simple, &elig, &catalog(), &w);

        // busy: 5 * 0.15 - 0.10; simple: 2 * 0.15. The penalty narrows the
        // gap the extra keys would otherwise open.
        assert!(busy_score - simple_score < 3.0 * w.yes_bonus);

        let five_no_bonus = candidate("plain5", 3.0, "payroll, auto transfer, credit card, mobile app, youth");
        let none = BTreeMap::new();
        let unanswered =
            score_candidate(ProductType::Savings, &five_no_bonus, &none, &catalog(), &w);
        let simple_unanswered =
            score_candidate(ProductType::Savings, &simple, &none, &catalog(), &w);
        assert!(unanswered < simple_unanswered);
    }

    #[test]
    fn equal_scores_keep_pool_order_and_duplicates_collapse() {
        let a = candidate("a", 3.0, "");
        let b = candidate("b", 3.0, "");
        let a_again = candidate("a", 3.0, "");
        let ranked = rank_candidates(
            ProductType::Savings,
            &[a.clone(), b.clone(), a_again],
            &BTreeMap::new(),
            &catalog(),
            &ScoringWeights::default(),
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], a);
        assert_eq!(ranked[1], b);
    }
}
