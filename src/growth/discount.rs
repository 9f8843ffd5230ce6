//! Inflation discounting and compounding helpers shared by the growth models
//!
//! Supports:
//! - Real (inflation-adjusted) rates via the Fisher relation
//! - Discounting a nominal amount back over whole years or elapsed months
//! - Future value of a monthly annuity due, with the zero-rate case handled

use serde::{Deserialize, Serialize};

/// Below this magnitude a periodic rate is treated as zero
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Annual inflation assumption used to produce real (today's money) figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inflation {
    /// Annual inflation as a decimal (0.06 for 6%)
    pub annual_rate: f64,
}

impl Inflation {
    /// Inflation from a percentage input. `None` or a non-positive rate means
    /// no adjustment was requested.
    pub fn from_pct(inflation_pct: Option<f64>) -> Option<Self> {
        match inflation_pct {
            Some(pct) if pct > 0.0 => Some(Self {
                annual_rate: pct / 100.0,
            }),
            _ => None,
        }
    }

    /// Real annual rate for a nominal annual rate (both decimals):
    /// (1 + nominal) / (1 + inflation) - 1
    pub fn real_rate(&self, nominal_annual: f64) -> f64 {
        (1.0 + nominal_annual) / (1.0 + self.annual_rate) - 1.0
    }

    /// Discount a value back over whole (or fractional) years
    pub fn discount_years(&self, value: f64, years: f64) -> f64 {
        value / (1.0 + self.annual_rate).powf(years)
    }

    /// Discount a value back over elapsed months at inflation / 12 per month
    pub fn discount_months(&self, value: f64, months: u32) -> f64 {
        value / (1.0 + self.annual_rate / 12.0).powi(months as i32)
    }
}

/// Future value of `n_months` payments made at the start of each month:
/// P * [((1 + r)^n - 1) / r] * (1 + r), or P * n when r is zero
pub fn annuity_due_future_value(payment: f64, monthly_rate: f64, n_months: u32) -> f64 {
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        return payment * n_months as f64;
    }

    let growth = (1.0 + monthly_rate).powi(n_months as i32);
    payment * ((growth - 1.0) / monthly_rate) * (1.0 + monthly_rate)
}

/// Level payment that amortizes `principal` over `n_months` at `monthly_rate`
pub fn level_payment(principal: f64, monthly_rate: f64, n_months: u32) -> f64 {
    if n_months == 0 {
        return principal;
    }
    if monthly_rate.abs() < ZERO_RATE_EPSILON {
        return principal / n_months as f64;
    }

    let growth = (1.0 + monthly_rate).powi(n_months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_inflation_from_pct() {
        assert!(Inflation::from_pct(None).is_none());
        assert!(Inflation::from_pct(Some(0.0)).is_none());

        let inflation = Inflation::from_pct(Some(6.0)).unwrap();
        assert_abs_diff_eq!(inflation.annual_rate, 0.06, epsilon = 1e-12);
    }

    #[test]
    fn test_real_rate() {
        let inflation = Inflation::from_pct(Some(6.0)).unwrap();
        let real = inflation.real_rate(0.12);
        assert_abs_diff_eq!(real, 1.12 / 1.06 - 1.0, epsilon = 1e-12);
        assert!(real < 0.12 - 0.06 + 0.001);
    }

    #[test]
    fn test_discounting() {
        let inflation = Inflation::from_pct(Some(5.0)).unwrap();
        assert_abs_diff_eq!(inflation.discount_years(105.0, 1.0), 100.0, epsilon = 1e-9);

        let monthly = inflation.discount_months(100.0, 12);
        let expected = 100.0 / (1.0_f64 + 0.05 / 12.0).powi(12);
        assert_abs_diff_eq!(monthly, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_annuity_due_zero_rate() {
        assert_abs_diff_eq!(annuity_due_future_value(500.0, 0.0, 24), 12_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_level_payment() {
        // 100,000 over 12 months at 1% per month ≈ 8,884.88
        let pmt = level_payment(100_000.0, 0.01, 12);
        assert!((pmt - 8_884.88).abs() < 0.01);

        assert_abs_diff_eq!(level_payment(120_000.0, 0.0, 12), 10_000.0, epsilon = 1e-9);
    }
}
