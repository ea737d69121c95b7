//! Condition catalog
//!
//! Maps normalized eligibility keys (salary_transfer, card_spend, ...) to the
//! free-text patterns that indicate them, the question to ask the user, and an
//! optional explanation shown on confusion. The catalog is append-only: an
//! offline curator proposes new entries, the validation gate here decides what
//! becomes visible, and the matcher only ever reads the active subset.

mod matcher;
mod store;
mod types;
mod validate;

pub use matcher::{find_keys, summarize_condition};
pub use store::CatalogStore;
pub use types::{ConditionCatalog, ConditionEntry};
pub use validate::{GateError, GatePolicy, ProposedEntry, validate_proposed};
