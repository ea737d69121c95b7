// src/config/advisor.rs
// Dialogue tuning knobs: scoring weights, ask budget, pool limits.
// All empirical values; overridable per deployment rather than baked in.

use serde::{Deserialize, Serialize};

use super::helpers::env_parsed_or;
use crate::dialogue::{AskPolicy, ScoringWeights};
use crate::products::PoolLimits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub scoring: ScoringWeights,
    pub ask: AskPolicy,
    pub pool: PoolLimits,
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        let scoring_defaults = ScoringWeights::default();
        let ask_defaults = AskPolicy::default();
        let pool_defaults = PoolLimits::default();

        Self {
            scoring: ScoringWeights {
                yes_bonus: env_parsed_or("TELLER_SCORE_YES_BONUS", scoring_defaults.yes_bonus),
                no_penalty: env_parsed_or("TELLER_SCORE_NO_PENALTY", scoring_defaults.no_penalty),
                complexity_penalty: env_parsed_or(
                    "TELLER_SCORE_COMPLEXITY_PENALTY",
                    scoring_defaults.complexity_penalty,
                ),
                complexity_threshold: env_parsed_or(
                    "TELLER_SCORE_COMPLEXITY_THRESHOLD",
                    scoring_defaults.complexity_threshold,
                ),
                top_k: env_parsed_or("TELLER_TOP_K", scoring_defaults.top_k),
            },
            ask: AskPolicy {
                slot_ask_cap: env_parsed_or("TELLER_SLOT_ASK_CAP", ask_defaults.slot_ask_cap),
            },
            pool: PoolLimits {
                top_by_rate: env_parsed_or("TELLER_POOL_TOP_BY_RATE", pool_defaults.top_by_rate),
                top_by_condition: env_parsed_or(
                    "TELLER_POOL_TOP_BY_CONDITION",
                    pool_defaults.top_by_condition,
                ),
                per_provider: env_parsed_or(
                    "TELLER_POOL_PER_PROVIDER",
                    pool_defaults.per_provider,
                ),
            },
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            ask: AskPolicy::default(),
            pool: PoolLimits::default(),
        }
    }
}
