//! Dialogue core
//!
//! The per-turn state machine: session state, slot/condition question
//! selection, candidate scoring, and the turn orchestrator that ties them to
//! the catalog stores and the NLU collaborator.

mod orchestrator;
mod scoring;
mod slots;
mod state;

pub use orchestrator::{
    Orchestrator, Recommendation, RecommendedProduct, TurnStage, TypeResolution, is_confused,
    quick_yes_no,
};
pub use scoring::{ScoringWeights, rank_candidates, score_candidate};
pub use slots::{AskPolicy, SlotId, pick_condition_question, pick_slot_question, required_slots};
pub use state::{ChatTurn, CollectedFacts, Eligibility, Question, Role, SessionState};
