// src/products/pool.rs
// Candidate pool assembly: union of three selection strategies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::store::ProductStore;
use super::types::{Candidate, ProductType};
use crate::error::TellerResult;

/// Tunable pool sizes. A plain top-N by rate systematically hides products
/// whose base rate is modest but whose condition-driven bonus is large, so
/// the pool is a union of rate leaders, condition-rich rows and a
/// provider-diverse slice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolLimits {
    pub top_by_rate: u32,
    pub top_by_condition: u32,
    pub per_provider: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            top_by_rate: 250,
            top_by_condition: 250,
            per_provider: 3,
        }
    }
}

/// Drop duplicate candidates, keeping first-seen order.
pub fn dedupe_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(candidates.len());
    for c in candidates {
        if seen.insert(c.identity()) {
            out.push(c);
        }
    }
    out
}

/// Keep at most `cap` candidates per provider, preserving order.
pub fn cap_per_provider(candidates: &[Candidate], cap: usize) -> Vec<Candidate> {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    let mut out = Vec::new();
    for c in candidates {
        let n = counts.entry(c.provider.as_str()).or_insert(0);
        if *n >= cap {
            continue;
        }
        *n += 1;
        out.push(c.clone());
    }
    out
}

/// Assemble the deduplicated candidate pool for one turn.
///
/// Union order matters: the rate-ordered list comes first so first-seen
/// de-duplication keeps the best-rate copy of each product.
pub async fn build_pool(
    store: &ProductStore,
    product_type: ProductType,
    limits: &PoolLimits,
) -> TellerResult<Vec<Candidate>> {
    let rate_list = store.top_by_rate(product_type, limits.top_by_rate).await?;
    let condition_list = store
        .top_by_condition_text(product_type, limits.top_by_condition)
        .await?;
    let diverse_list = cap_per_provider(&rate_list, limits.per_provider);

    let mut combined = rate_list;
    combined.extend(condition_list);
    combined.extend(diverse_list);

    Ok(dedupe_candidates(combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, provider: &str, rate: f64) -> Candidate {
        Candidate {
            id: id.to_string(),
            provider: provider.to_string(),
            name: format!("{id} product"),
            rate,
            condition_raw: String::new(),
        }
    }

    #[test]
    fn dedupe_keeps_first_seen() {
        let a = candidate("p1", "Alpha", 3.5);
        let mut b = candidate("p1", "Alpha", 2.0);
        b.name = "different copy".into();
        let c = candidate("p2", "Beta", 3.0);

        let out = dedupe_candidates(vec![a.clone(), b, c.clone()]);
        assert_eq!(out, vec![a, c]);
    }

    #[test]
    fn dedupe_uses_provider_name_fallback_when_id_missing() {
        let mut a = candidate("", "Alpha", 3.5);
        a.name = "Same".into();
        let mut b = candidate("", "Alpha", 1.0);
        b.name = "Same".into();

        let out = dedupe_candidates(vec![a, b]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn per_provider_cap_limits_each_bank() {
        let list = vec![
            candidate("a1", "Alpha", 4.0),
            candidate("a2", "Alpha", 3.9),
            candidate("a3", "Alpha", 3.8),
            candidate("b1", "Beta", 3.7),
        ];
        let out = cap_per_provider(&list, 2);
        assert_eq!(
            out.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec!["a1", "a2", "b1"]
        );
    }
}
