// src/products/types.rs

use serde::{Deserialize, Serialize};

/// The six product types the advisor can recommend.
///
/// Fixed at session start and immutable afterwards. Loan variants invert the
/// rate ordering everywhere: a borrower wants the lowest rate, a saver the
/// highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Savings,
    Deposit,
    Pension,
    MortgageLoan,
    LeaseLoan,
    CreditLoan,
}

impl ProductType {
    pub const ALL: [ProductType; 6] = [
        ProductType::Savings,
        ProductType::Deposit,
        ProductType::Pension,
        ProductType::MortgageLoan,
        ProductType::LeaseLoan,
        ProductType::CreditLoan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Savings => "savings",
            ProductType::Deposit => "deposit",
            ProductType::Pension => "pension",
            ProductType::MortgageLoan => "mortgage_loan",
            ProductType::LeaseLoan => "lease_loan",
            ProductType::CreditLoan => "credit_loan",
        }
    }

    /// Parse an identifier coming from the NLU collaborator. Anything outside
    /// the fixed six yields `None`; callers coerce that to a re-ask instead of
    /// propagating it.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "savings" | "saving" | "installment_savings" => Some(ProductType::Savings),
            "deposit" | "time_deposit" => Some(ProductType::Deposit),
            "pension" | "pension_savings" | "annuity" => Some(ProductType::Pension),
            "mortgage_loan" | "mortgage" | "home_loan" => Some(ProductType::MortgageLoan),
            "lease_loan" | "lease_deposit_loan" | "jeonse_loan" | "rent_loan" => {
                Some(ProductType::LeaseLoan)
            }
            "credit_loan" | "personal_loan" | "credit" => Some(ProductType::CreditLoan),
            _ => None,
        }
    }

    /// True for the three borrowing products, where a lower rate is better.
    pub fn is_loan(&self) -> bool {
        matches!(
            self,
            ProductType::MortgageLoan | ProductType::LeaseLoan | ProductType::CreditLoan
        )
    }

    /// Human-readable label for replies.
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Savings => "installment savings",
            ProductType::Deposit => "time deposit",
            ProductType::Pension => "pension savings",
            ProductType::MortgageLoan => "mortgage loan",
            ProductType::LeaseLoan => "lease-deposit loan",
            ProductType::CreditLoan => "credit loan",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product as read from the catalog store.
///
/// `rate` is the single representative rate the sync job selected: the
/// highest offered rate for savings-like products, the lowest for loans.
/// Candidates are read fresh every turn and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub rate: f64,
    pub condition_raw: String,
}

impl Candidate {
    /// Identity used for pool de-duplication. Falls back to provider + name
    /// when the upstream registry id is missing.
    pub fn identity(&self) -> String {
        if self.id.is_empty() {
            format!("{}::{}", self.provider, self.name)
        } else {
            self.id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_and_rejects_garbage() {
        assert_eq!(ProductType::parse("savings"), Some(ProductType::Savings));
        assert_eq!(ProductType::parse(" ANNUITY "), Some(ProductType::Pension));
        assert_eq!(
            ProductType::parse("jeonse_loan"),
            Some(ProductType::LeaseLoan)
        );
        assert_eq!(ProductType::parse("crypto"), None);
        assert_eq!(ProductType::parse(""), None);
    }

    #[test]
    fn identity_falls_back_to_provider_and_name() {
        let c = Candidate {
            id: String::new(),
            provider: "Alpha Bank".into(),
            name: "Dream Saver".into(),
            rate: 3.2,
            condition_raw: String::new(),
        };
        assert_eq!(c.identity(), "Alpha Bank::Dream Saver");
    }
}
