// src/dialogue/state.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::slots::SlotId;
use crate::products::ProductType;

/// The user's status against one condition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eligibility {
    Yes,
    No,
    Unknown,
}

impl Eligibility {
    /// Parse the wire form coming from the NLU collaborator. Anything else
    /// is dropped by the caller rather than coerced.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(Eligibility::Yes),
            "no" => Some(Eligibility::No),
            "unknown" => Some(Eligibility::Unknown),
            _ => None,
        }
    }

    /// Resolved means the user gave a definitive answer; `Unknown` keeps the
    /// condition askable.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Eligibility::Yes | Eligibility::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation history, as passed to NLU classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A question issued to the user. `key` is the identifier recorded in the
/// asked ledger (`slot:<name>` or `cond:<key>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub key: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preface: Option<String>,
}

/// Facts gathered so far, echoed back in the final recommendation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectedFacts {
    pub slots: BTreeMap<SlotId, i64>,
    pub eligibility: BTreeMap<String, Eligibility>,
}

/// Per-conversation dialogue state.
///
/// Owned by the front door per session id, handed to the orchestrator by
/// reference for exactly one turn at a time, and never mutated concurrently.
/// Ordered collections keep every iteration deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Set once on the first classified turn, immutable afterwards.
    pub product_type: Option<ProductType>,
    /// Required facts gathered so far. Keys only ever accumulate.
    pub slots: BTreeMap<SlotId, i64>,
    /// Condition answers; a later answer for the same key overwrites.
    pub eligibility: BTreeMap<String, Eligibility>,
    /// Every question identifier ever issued. Monotonically growing; a
    /// question identifier is never issued twice.
    pub asked: BTreeSet<String>,
    /// Times each slot has been asked, bounded by the ask cap.
    pub slot_ask_counts: BTreeMap<SlotId, u8>,
    /// The single outstanding question, used to interpret the next message.
    pub last_question: Option<Question>,
    /// Whether a non-final draft list has been surfaced yet.
    pub draft_shown: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The condition key of the outstanding question, if the outstanding
    /// question is a condition question.
    pub fn outstanding_condition_key(&self) -> Option<String> {
        self.last_question
            .as_ref()
            .and_then(|q| q.key.strip_prefix("cond:"))
            .map(|k| k.to_string())
    }

    pub fn ask_count(&self, slot: SlotId) -> u8 {
        self.slot_ask_counts.get(&slot).copied().unwrap_or(0)
    }

    /// Required slots not yet filled, in required order.
    pub fn missing_slots(&self, required: &[SlotId]) -> Vec<SlotId> {
        required
            .iter()
            .copied()
            .filter(|s| !self.slots.contains_key(s))
            .collect()
    }

    pub fn collected(&self) -> CollectedFacts {
        CollectedFacts {
            slots: self.slots.clone(),
            eligibility: self.eligibility.clone(),
        }
    }
}
