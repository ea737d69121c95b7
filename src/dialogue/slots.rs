// src/dialogue/slots.rs
// Required-slot tables and single-question selection.

use serde::{Deserialize, Serialize};

use super::state::{Question, SessionState};
use crate::catalog::ConditionCatalog;
use crate::products::ProductType;

/// A required numeric fact. Amounts are whole currency units, terms are
/// months.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    MonthlyAmount,
    LumpSum,
    TermMonths,
    IncomeMonthly,
    DesiredAmount,
}

impl SlotId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotId::MonthlyAmount => "monthly_amount",
            SlotId::LumpSum => "lump_sum",
            SlotId::TermMonths => "term_months",
            SlotId::IncomeMonthly => "income_monthly",
            SlotId::DesiredAmount => "desired_amount",
        }
    }

    /// Parse a slot name coming from NLU output; unknown names are dropped.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "monthly_amount" => Some(SlotId::MonthlyAmount),
            "lump_sum" => Some(SlotId::LumpSum),
            "term_months" => Some(SlotId::TermMonths),
            "income_monthly" => Some(SlotId::IncomeMonthly),
            "desired_amount" => Some(SlotId::DesiredAmount),
            _ => None,
        }
    }

    pub fn question_text(&self) -> &'static str {
        match self {
            SlotId::MonthlyAmount => "How much do you plan to put in each month? (e.g. 300,000)",
            SlotId::LumpSum => "How large is the lump sum you want to park? (e.g. 10,000,000)",
            SlotId::TermMonths => "What term are you thinking of? (e.g. 12 or 24 months)",
            SlotId::IncomeMonthly => "Roughly what is your monthly take-home income? (e.g. 3,000,000)",
            SlotId::DesiredAmount => "How much do you need to borrow? (e.g. 50,000,000)",
        }
    }

    fn ledger_key(&self) -> String {
        format!("slot:{}", self.as_str())
    }
}

/// Required slots per product type, in ask order.
pub fn required_slots(product_type: ProductType) -> &'static [SlotId] {
    match product_type {
        ProductType::Savings => &[SlotId::MonthlyAmount, SlotId::TermMonths],
        ProductType::Deposit => &[SlotId::LumpSum, SlotId::TermMonths],
        ProductType::Pension => &[SlotId::MonthlyAmount],
        ProductType::MortgageLoan | ProductType::LeaseLoan | ProductType::CreditLoan => {
            &[SlotId::DesiredAmount, SlotId::IncomeMonthly]
        }
    }
}

/// Per-slot retry budget. The cap is a tuning knob, not a derived value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AskPolicy {
    pub slot_ask_cap: u8,
}

impl Default for AskPolicy {
    fn default() -> Self {
        Self { slot_ask_cap: 2 }
    }
}

/// Pick at most one slot question.
///
/// Walks `missing` in required order and skips anything already asked or at
/// its cap; the first eligible slot is charged against its budget and its
/// identifier enters the asked ledger. These two guards are the only writers
/// of the ledger for slots, which is what makes the no-repeat invariant
/// structural rather than checked.
pub fn pick_slot_question(
    missing: &[SlotId],
    state: &mut SessionState,
    policy: &AskPolicy,
) -> Option<Question> {
    for slot in missing {
        let key = slot.ledger_key();
        if state.asked.contains(&key) {
            continue;
        }
        if state.ask_count(*slot) >= policy.slot_ask_cap {
            continue;
        }
        state.asked.insert(key.clone());
        *state.slot_ask_counts.entry(*slot).or_insert(0) += 1;
        return Some(Question {
            key,
            text: slot.question_text().to_string(),
            preface: Some("A quick detail so I can narrow things down.".to_string()),
        });
    }
    None
}

/// Pick at most one condition question from the keys relevant to the current
/// candidate pool, in catalog order. Resolved (yes/no) and already-asked keys
/// are skipped; `Unknown` keeps a key askable but it will be skipped anyway
/// once its identifier is in the ledger.
pub fn pick_condition_question(
    relevant_keys: &[String],
    state: &mut SessionState,
    catalog: &ConditionCatalog,
) -> Option<Question> {
    for key in relevant_keys {
        let ledger_key = format!("cond:{key}");
        if state.asked.contains(&ledger_key) {
            continue;
        }
        if state
            .eligibility
            .get(key)
            .map(|e| e.is_resolved())
            .unwrap_or(false)
        {
            continue;
        }

        let question = match catalog.get(key) {
            Some(entry) if !entry.question.is_empty() => entry.question.clone(),
            _ => continue,
        };

        state.asked.insert(ledger_key.clone());
        return Some(Question {
            key: ledger_key,
            text: question,
            preface: Some(
                "One more thing - it decides whether you get the bonus rate.".to_string(),
            ),
        });
    }
    None
}
