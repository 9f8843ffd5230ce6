//! Equated Monthly Installment (loan repayment) with amortization schedule
//!
//! Headline figures and every money field of the schedule are rounded to whole
//! currency units. Two inflation conventions coexist:
//! - `real_emi` / `real_total_payable` discount once over the full tenure
//! - schedule rows discount per elapsed month at inflation / 12

use serde::{Deserialize, Serialize};

use super::discount::{level_payment, Inflation};

/// Months of amortization detail kept in the schedule (first five years)
pub const EMI_SCHEDULE_MONTHS: u32 = 60;

/// One month of the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub emi: f64,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding balance after this month's payment, floored at zero
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_emi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResult {
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,

    pub emi: f64,
    pub total_payable: f64,
    pub total_interest: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_emi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_total_payable: Option<f64>,

    pub breakdown: Vec<AmortizationRow>,
}

/// Monthly installment for a loan of `loan_amount` at `annual_interest_pct`
/// repaid over `tenure_years`.
pub fn emi(
    loan_amount: f64,
    annual_interest_pct: f64,
    tenure_years: u32,
    inflation_pct: Option<f64>,
) -> EmiResult {
    let monthly_rate = annual_interest_pct / 100.0 / 12.0;
    let total_months = tenure_years * 12;

    let installment = level_payment(loan_amount, monthly_rate, total_months);
    let total_payable = installment * total_months as f64;
    let total_interest = total_payable - loan_amount;

    let inflation = Inflation::from_pct(inflation_pct);
    let real_emi = inflation.map(|i| i.discount_years(installment, tenure_years as f64).round());
    let real_total_payable =
        inflation.map(|i| i.discount_years(total_payable, tenure_years as f64).round());

    let mut breakdown = Vec::with_capacity(total_months.min(EMI_SCHEDULE_MONTHS) as usize);
    let mut balance = loan_amount;

    for month in 1..=total_months.min(EMI_SCHEDULE_MONTHS) {
        let interest = balance * monthly_rate;
        let principal = installment - interest;
        balance -= principal;
        let reported_balance = balance.max(0.0);

        breakdown.push(AmortizationRow {
            month,
            emi: installment.round(),
            principal: principal.round(),
            interest: interest.round(),
            balance: reported_balance.round(),
            real_emi: inflation.map(|i| i.discount_months(installment, month).round()),
            real_balance: inflation.map(|i| i.discount_months(reported_balance, month).round()),
        });
    }

    EmiResult {
        loan_amount,
        interest_rate: annual_interest_pct,
        tenure: tenure_years,
        inflation_rate: inflation_pct,
        emi: installment.round(),
        total_payable: total_payable.round(),
        total_interest: total_interest.round(),
        real_emi,
        real_total_payable,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_emi_known_value() {
        // 10 lakh at 8.5% for 20 years ≈ 8,678/month
        let result = emi(1_000_000.0, 8.5, 20, None);
        assert_eq!(result.emi, 8_678.0);
        assert_eq!(result.breakdown.len(), 60);
        assert!(result.real_emi.is_none());
        assert!(result.breakdown.iter().all(|row| row.real_balance.is_none()));
    }

    #[test]
    fn test_totals_hold_by_construction() {
        let result = emi(2_500_000.0, 9.25, 15, None);
        let monthly_rate = 9.25 / 100.0 / 12.0;
        let exact = level_payment(2_500_000.0, monthly_rate, 180);
        assert_abs_diff_eq!(result.total_payable, (exact * 180.0).round(), epsilon = 1e-9);
        assert!((result.total_interest - (result.total_payable - 2_500_000.0)).abs() <= 1.0);
        // Rounded EMI times n stays within about n/2 of the rounded total
        assert!((result.emi * 180.0 - result.total_payable).abs() <= 91.0);
    }

    #[test]
    fn test_schedule_reaches_zero_within_tenure() {
        for tenure in 1..=5 {
            let result = emi(500_000.0, 10.0, tenure, None);
            assert_eq!(result.breakdown.len(), (tenure * 12) as usize);

            let mut previous = f64::INFINITY;
            for row in &result.breakdown {
                assert!(row.balance <= previous, "balance rose at month {}", row.month);
                assert!(row.balance >= 0.0);
                previous = row.balance;
            }
            assert_eq!(result.breakdown.last().unwrap().balance, 0.0);
        }
    }

    #[test]
    fn test_zero_interest_rate() {
        let result = emi(120_000.0, 0.0, 1, None);
        assert_eq!(result.emi, 10_000.0);
        assert_eq!(result.total_interest, 0.0);
        assert!(result.breakdown.iter().all(|row| row.interest == 0.0));
        assert_eq!(result.breakdown.last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_inflation_conventions_stay_distinct() {
        let result = emi(1_000_000.0, 8.5, 20, Some(6.0));
        let exact = level_payment(1_000_000.0, 8.5 / 1200.0, 240);

        // Headline: single discount over the full tenure
        assert_eq!(result.real_emi, Some((exact / 1.06_f64.powi(20)).round()));

        // Schedule: per-month discount at inflation / 12
        let first = &result.breakdown[0];
        assert_eq!(first.real_emi, Some((exact / (1.0 + 0.06 / 12.0)).round()));
        assert!(result.real_emi.unwrap() < first.real_emi.unwrap());
    }
}
