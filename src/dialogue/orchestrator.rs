// src/dialogue/orchestrator.rs
// Per-turn driver: confusion handling, quick yes/no shortcut, NLU merge,
// pool rebuild, question selection, stage decision.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::scoring::{ScoringWeights, rank_candidates};
use super::slots::{AskPolicy, SlotId, pick_condition_question, pick_slot_question, required_slots};
use super::state::{ChatTurn, CollectedFacts, Eligibility, Question, SessionState};
use crate::catalog::{CatalogStore, ConditionCatalog, find_keys, summarize_condition};
use crate::error::{TellerError, TellerResult};
use crate::interest;
use crate::nlu::{GuideAction, NluService};
use crate::products::{Candidate, PoolLimits, ProductStore, ProductType, build_pool};

const SLOT_DRAFT_PREFACE: &str =
    "Here's a first pass based on typical conditions - a draft, not the final pick.";
const COND_DRAFT_PREFACE: &str =
    "No problem if the details are fuzzy. I've parked a few candidates; one answer will sharpen them.";
const WHY_RECOMMENDED: &str =
    "Strong rate for this product type, and you're likely to meet its bonus conditions based on your answers.";

/// Messages longer than this are never treated as confusion, whatever they
/// contain: a long reply is an answer, not a request to explain.
const CONFUSION_MAX_CHARS: usize = 80;

/// Outcome of a turn: exactly one of the three stages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum TurnStage {
    Ask {
        question: Question,
    },
    Draft {
        preface: String,
        candidates_text: String,
        draft: Vec<Candidate>,
        next_question: Option<Question>,
    },
    Final {
        recommendation: Recommendation,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendedProduct {
    pub provider: String,
    pub name: String,
    pub rate: f64,
    pub condition_summary: String,
    pub condition_raw: String,
    pub why_recommended: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub product_type: ProductType,
    pub reason: String,
    pub products: Vec<RecommendedProduct>,
    pub notes: String,
    pub collected: CollectedFacts,
}

/// Outcome of the product-type resolution step.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeResolution {
    Ask { question: String },
    Resolved { product_type: ProductType },
}

/// Literal yes/no/unknown tokens answered to a condition question, resolved
/// without an NLU round trip.
pub fn quick_yes_no(message: &str) -> Option<Eligibility> {
    let t = message
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase();

    const YES: &[&str] = &[
        "yes", "y", "yeah", "yep", "yup", "sure", "ok", "okay", "of course", "i can", "can do",
        "definitely",
    ];
    const NO: &[&str] = &[
        "no", "n", "nope", "nah", "can't", "cant", "cannot", "i can't", "i cant", "not possible",
        "no way",
    ];
    const UNKNOWN: &[&str] = &[
        "not sure",
        "unsure",
        "dunno",
        "don't know",
        "dont know",
        "i don't know",
        "i dont know",
        "maybe",
        "no idea",
        "hard to say",
    ];

    if YES.contains(&t.as_str()) {
        Some(Eligibility::Yes)
    } else if NO.contains(&t.as_str()) {
        Some(Eligibility::No)
    } else if UNKNOWN.contains(&t.as_str()) {
        Some(Eligibility::Unknown)
    } else {
        None
    }
}

/// Heuristic for "the user did not understand the question": a short message
/// containing a confusion marker.
pub fn is_confused(message: &str) -> bool {
    let t = message.trim().to_lowercase();
    if t.chars().count() > CONFUSION_MAX_CHARS {
        return false;
    }

    const MARKERS: &[&str] = &[
        "what do you mean",
        "what does that mean",
        "what is that",
        "what's that",
        "don't understand",
        "dont understand",
        "confus",
        "explain",
        "huh",
        "??",
    ];
    MARKERS.iter().any(|m| t.contains(m))
}

/// The per-turn state machine.
///
/// Holds read-only handles to the stores and the NLU collaborator; all
/// dialogue state lives in the `SessionState` the front door injects for the
/// duration of one turn.
pub struct Orchestrator {
    products: ProductStore,
    catalog: CatalogStore,
    nlu: Arc<dyn NluService>,
    scoring: ScoringWeights,
    ask_policy: AskPolicy,
    pool_limits: PoolLimits,
}

impl Orchestrator {
    pub fn new(
        products: ProductStore,
        catalog: CatalogStore,
        nlu: Arc<dyn NluService>,
        scoring: ScoringWeights,
        ask_policy: AskPolicy,
        pool_limits: PoolLimits,
    ) -> Self {
        Self {
            products,
            catalog,
            nlu,
            scoring,
            ask_policy,
            pool_limits,
        }
    }

    /// First-turn routing: fix the product type or ask to clarify.
    ///
    /// Malformed or out-of-enum classifier output never propagates; it
    /// collapses to a clarifying re-ask.
    pub async fn resolve_product_type(
        &self,
        user_message: &str,
        history: &[ChatTurn],
    ) -> TellerResult<TypeResolution> {
        let decision = self
            .nlu
            .classify_product_type(user_message, history)
            .await?;

        match (decision.action, decision.product_type) {
            (GuideAction::Proceed, Some(product_type)) => {
                Ok(TypeResolution::Resolved { product_type })
            }
            _ => Ok(TypeResolution::Ask {
                question: decision.question,
            }),
        }
    }

    /// Advance the dialogue by one turn.
    ///
    /// Mutates `state` in place and returns the stage to render. On error the
    /// caller must discard the mutated state copy so the turn can be retried
    /// against the previous state.
    pub async fn advance_turn(
        &self,
        state: &mut SessionState,
        user_message: &str,
        history: &[ChatTurn],
    ) -> TellerResult<TurnStage> {
        let product_type = state
            .product_type
            .ok_or_else(|| TellerError::invalid_request("product type not resolved yet"))?;

        let catalog = self.catalog.load_active().await?;

        // Confusion about the outstanding condition question: explain and
        // re-issue the same question, advancing nothing else.
        if let Some(reissue) = self.reissue_on_confusion(state, user_message, &catalog) {
            return Ok(TurnStage::Ask { question: reissue });
        }

        // Trivially unambiguous answers skip the NLU round trip.
        if let Some(answer) = quick_yes_no(user_message) {
            if let Some(key) = state.outstanding_condition_key() {
                debug!("quick answer {:?} for condition '{}'", answer, key);
                state.eligibility.insert(key, answer);
            }
        }

        // NLU extraction always runs as well; merges are additive.
        let last_key = state.last_question.as_ref().map(|q| q.key.clone());
        let facts = self
            .nlu
            .extract_facts(product_type, last_key.as_deref(), user_message)
            .await?;
        for (name, value) in &facts.slots {
            if let Some(slot) = SlotId::parse(name) {
                state.slots.insert(slot, *value);
            }
        }
        for (key, answer) in &facts.eligibility {
            state.eligibility.insert(key.clone(), *answer);
        }

        // Fresh pool and fresh relevant keys every turn; eligibility answers
        // re-score the pool but never filter it.
        let pool = build_pool(&self.products, product_type, &self.pool_limits).await?;
        let pool_text: String = pool
            .iter()
            .map(|c| c.condition_raw.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let relevant_keys = find_keys(&pool_text, &catalog);
        debug!(
            "turn: {} candidates, {} relevant conditions, {} history turns",
            pool.len(),
            relevant_keys.len(),
            history.len()
        );

        // Required slots still missing: draft plus one question.
        let missing = state.missing_slots(required_slots(product_type));
        if !missing.is_empty() {
            let all_capped = missing
                .iter()
                .all(|s| state.ask_count(*s) >= self.ask_policy.slot_ask_cap);

            if !all_capped {
                if let Some(q) = pick_slot_question(&missing, state, &self.ask_policy) {
                    return Ok(self.draft_stage(
                        product_type,
                        &pool,
                        &catalog,
                        state,
                        SLOT_DRAFT_PREFACE,
                        q,
                    ));
                }
            }
            if let Some(q) = pick_condition_question(&relevant_keys, state, &catalog) {
                return Ok(self.draft_stage(
                    product_type,
                    &pool,
                    &catalog,
                    state,
                    COND_DRAFT_PREFACE,
                    q,
                ));
            }
        }

        // Slots settled (filled, or abandoned at their cap): plain condition
        // question, no repeated draft.
        if let Some(q) = pick_condition_question(&relevant_keys, state, &catalog) {
            state.last_question = Some(q.clone());
            return Ok(TurnStage::Ask { question: q });
        }

        // Nothing left to ask: final recommendation.
        let ranked = rank_candidates(
            product_type,
            &pool,
            &state.eligibility,
            &catalog,
            &self.scoring,
        );
        let recommendation = build_recommendation(product_type, &ranked, &catalog, state);
        state.last_question = None;
        Ok(TurnStage::Final { recommendation })
    }

    fn reissue_on_confusion(
        &self,
        state: &SessionState,
        user_message: &str,
        catalog: &ConditionCatalog,
    ) -> Option<Question> {
        let last = state.last_question.as_ref()?;
        let key = last.key.strip_prefix("cond:")?;
        if !is_confused(user_message) {
            return None;
        }
        let entry = catalog.get(key)?;
        if entry.explain.is_empty() {
            return None;
        }
        Some(Question {
            key: last.key.clone(),
            text: last.text.clone(),
            preface: Some(format!(
                "{}\nIf that clears it up, just answer this one:",
                entry.explain
            )),
        })
    }

    fn draft_stage(
        &self,
        product_type: ProductType,
        pool: &[Candidate],
        catalog: &ConditionCatalog,
        state: &mut SessionState,
        preface: &str,
        question: Question,
    ) -> TurnStage {
        let draft = rank_candidates(
            product_type,
            pool,
            &state.eligibility,
            catalog,
            &self.scoring,
        );
        state.draft_shown = true;
        state.last_question = Some(question.clone());
        TurnStage::Draft {
            preface: preface.to_string(),
            candidates_text: render_candidates_text(&draft),
            draft,
            next_question: Some(question),
        }
    }
}

fn render_candidates_text(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {} - {} (rate: {:.2}%)", i + 1, c.provider, c.name, c.rate))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_recommendation(
    product_type: ProductType,
    ranked: &[Candidate],
    catalog: &ConditionCatalog,
    state: &SessionState,
) -> Recommendation {
    let reason = match product_type {
        ProductType::Savings => {
            "Putting money aside every month points at installment savings; ranking uses catalog rates plus the bonus conditions you can meet."
        }
        ProductType::Deposit => {
            "Parking a lump sum in one go points at a time deposit; ranking uses catalog rates plus the bonus conditions you can meet."
        }
        ProductType::Pension => {
            "Long-horizon retirement saving points at pension savings; ranking uses catalog return rates plus the conditions you can meet."
        }
        ProductType::MortgageLoan | ProductType::LeaseLoan | ProductType::CreditLoan => {
            "Ranked from the lowest achievable rate for your goal, using catalog rates and the conditions you can meet."
        }
    };

    let mut notes: Vec<String> = Vec::new();
    if product_type.is_loan() {
        notes.push(
            "Actual rate and limit depend on income verification and your banking history."
                .to_string(),
        );
    } else {
        notes.push(
            "Bonus conditions like salary transfer, card spend or app sign-up can push the rate higher."
                .to_string(),
        );
    }

    if product_type == ProductType::Savings {
        if let (Some(&monthly), Some(&term), Some(best)) = (
            state.slots.get(&SlotId::MonthlyAmount),
            state.slots.get(&SlotId::TermMonths),
            ranked.first(),
        ) {
            let preview = interest::net_interest_preview(monthly, best.rate, term as u32);
            notes.push(format!(
                "Putting {} a month away for {} months at {:.2}% leaves about {} in interest after tax.",
                monthly, term, best.rate, preview.net_interest
            ));
        }
    }

    Recommendation {
        product_type,
        reason: reason.to_string(),
        products: ranked
            .iter()
            .map(|c| RecommendedProduct {
                provider: c.provider.clone(),
                name: c.name.clone(),
                rate: c.rate,
                condition_summary: summarize_condition(&c.condition_raw, catalog),
                condition_raw: c.condition_raw.clone(),
                why_recommended: WHY_RECOMMENDED.to_string(),
            })
            .collect(),
        notes: notes.join(" "),
        collected: state.collected(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_tokens_resolve_without_nlu() {
        assert_eq!(quick_yes_no("Yes."), Some(Eligibility::Yes));
        assert_eq!(quick_yes_no("  yep  "), Some(Eligibility::Yes));
        assert_eq!(quick_yes_no("nope"), Some(Eligibility::No));
        assert_eq!(quick_yes_no("I can't"), Some(Eligibility::No));
        assert_eq!(quick_yes_no("not sure"), Some(Eligibility::Unknown));
        assert_eq!(quick_yes_no("no idea"), Some(Eligibility::Unknown));
    }

    #[test]
    fn ordinary_answers_are_not_quick_tokens() {
        assert_eq!(quick_yes_no("yes, about 300k a month"), None);
        assert_eq!(quick_yes_no("300000"), None);
        assert_eq!(quick_yes_no(""), None);
    }

    #[test]
    fn confusion_needs_a_marker_and_a_short_message() {
        assert!(is_confused("what do you mean??"));
        assert!(is_confused("huh"));
        assert!(is_confused("can you explain that"));
        assert!(!is_confused("about 500k"));

        let long = format!("{} what do you mean by that", "context ".repeat(20));
        assert!(!is_confused(&long));
    }

    #[test]
    fn candidates_text_is_a_numbered_list() {
        let c = Candidate {
            id: "p1".into(),
            provider: "Alpha Bank".into(),
            name: "Dream Saver".into(),
            rate: 3.456,
            condition_raw: String::new(),
        };
        assert_eq!(
            render_candidates_text(&[c]),
            "1. Alpha Bank - Dream Saver (rate: 3.46%)"
        );
    }
}
