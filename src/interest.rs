// src/interest.rs
// Simple-interest savings math for the final-stage preview note.

/// Interest income tax rate applied to savings interest.
const INTEREST_TAX_RATE: f64 = 0.154;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestPreview {
    pub principal: i64,
    pub gross_interest: i64,
    pub net_interest: i64,
}

/// After-tax interest for an installment savings plan.
///
/// Simple interest on monthly deposits: each month's deposit earns for the
/// months it remains, so the rate applies to `n*(n+1)/2` month-deposits.
pub fn net_interest_preview(
    monthly_amount: i64,
    annual_rate_pct: f64,
    term_months: u32,
) -> InterestPreview {
    let n = term_months as f64;
    let gross = monthly_amount as f64 * (n * (n + 1.0) / 2.0) * (annual_rate_pct / 100.0 / 12.0);
    let net = gross * (1.0 - INTEREST_TAX_RATE);

    InterestPreview {
        principal: monthly_amount * term_months as i64,
        gross_interest: gross.round() as i64,
        net_interest: net.round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_month_plan_matches_hand_calculation() {
        // 500,000 a month at 4.0% for 12 months:
        // gross = 500000 * 78 * (0.04 / 12) = 130,000
        // net   = 130000 * 0.846 = 109,980
        let p = net_interest_preview(500_000, 4.0, 12);
        assert_eq!(p.principal, 6_000_000);
        assert_eq!(p.gross_interest, 130_000);
        assert_eq!(p.net_interest, 109_980);
    }

    #[test]
    fn zero_term_earns_nothing() {
        let p = net_interest_preview(500_000, 4.0, 0);
        assert_eq!(p.principal, 0);
        assert_eq!(p.gross_interest, 0);
        assert_eq!(p.net_interest, 0);
    }
}
