// src/catalog/types.rs

use serde::{Deserialize, Serialize};

/// One eligibility criterion.
///
/// `patterns` is ordered: earlier patterns are the stronger signal, and the
/// matcher stops at the first hit within an entry. Active entries always have
/// at least one pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEntry {
    pub key: String,
    pub patterns: Vec<String>,
    pub question: String,
    #[serde(default)]
    pub explain: String,
}

/// The active condition catalog, in load order.
///
/// Iteration order is the priority order for question selection and for
/// matcher output, so it must be stable across calls: the store loads rows in
/// insertion order and this type never reorders them.
#[derive(Debug, Clone, Default)]
pub struct ConditionCatalog {
    entries: Vec<ConditionEntry>,
}

impl ConditionCatalog {
    pub fn new(entries: Vec<ConditionEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&ConditionEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
