//! Input domains and defaults for each calculator
//!
//! Calculators assume sane inputs. Values arriving from the outside (CLI
//! flags, stored forms) are clamped into these ranges first; every adjustment
//! is logged at `warn`.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive range a numeric input is held to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value`, logging under `name` when it had to move.
    /// NaN is replaced by the lower bound.
    pub fn clamp(&self, name: &str, value: f64) -> f64 {
        let clamped = if value.is_nan() { self.min } else { value.clamp(self.min, self.max) };
        if clamped != value {
            warn!("{} {} outside [{}, {}], using {}", name, value, self.min, self.max, clamped);
        }
        clamped
    }

    /// Clamp a whole-year count
    pub fn clamp_years(&self, name: &str, years: u32) -> u32 {
        self.clamp(name, f64::from(years)) as u32
    }
}

pub const SIP_MONTHLY: Bounds = Bounds::new(100.0, 100_000.0);
pub const SIP_RETURN: Bounds = Bounds::new(1.0, 30.0);
pub const SIP_YEARS: Bounds = Bounds::new(1.0, 50.0);

pub const LUMP_SUM_PRINCIPAL: Bounds = Bounds::new(1_000.0, 10_000_000.0);
pub const LUMP_SUM_RETURN: Bounds = Bounds::new(1.0, 30.0);
pub const LUMP_SUM_YEARS: Bounds = Bounds::new(1.0, 50.0);

pub const EMI_LOAN: Bounds = Bounds::new(10_000.0, 50_000_000.0);
pub const EMI_RATE: Bounds = Bounds::new(1.0, 30.0);
pub const EMI_TENURE: Bounds = Bounds::new(1.0, 30.0);

pub const CAGR_VALUE: Bounds = Bounds::new(1_000.0, 100_000_000.0);
pub const CAGR_YEARS: Bounds = Bounds::new(1.0, 50.0);

pub const INFLATION: Bounds = Bounds::new(0.0, 15.0);
pub const DEFAULT_INFLATION_PCT: f64 = 6.0;

fn clamp_inflation(inflation_pct: Option<f64>) -> Option<f64> {
    inflation_pct.map(|pct| INFLATION.clamp("inflation", pct))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_investment: f64,
    pub annual_return: f64,
    pub years: u32,
    pub inflation_rate: Option<f64>,
}

impl Default for SipInput {
    fn default() -> Self {
        Self {
            monthly_investment: 5_000.0,
            annual_return: 12.0,
            years: 10,
            inflation_rate: None,
        }
    }
}

impl SipInput {
    pub fn clamped(self) -> Self {
        Self {
            monthly_investment: SIP_MONTHLY.clamp("monthly investment", self.monthly_investment),
            annual_return: SIP_RETURN.clamp("annual return", self.annual_return),
            years: SIP_YEARS.clamp_years("years", self.years),
            inflation_rate: clamp_inflation(self.inflation_rate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSumInput {
    pub principal: f64,
    pub annual_return: f64,
    pub years: u32,
    pub inflation_rate: Option<f64>,
}

impl Default for LumpSumInput {
    fn default() -> Self {
        Self {
            principal: 100_000.0,
            annual_return: 12.0,
            years: 10,
            inflation_rate: None,
        }
    }
}

impl LumpSumInput {
    pub fn clamped(self) -> Self {
        Self {
            principal: LUMP_SUM_PRINCIPAL.clamp("principal", self.principal),
            annual_return: LUMP_SUM_RETURN.clamp("annual return", self.annual_return),
            years: LUMP_SUM_YEARS.clamp_years("years", self.years),
            inflation_rate: clamp_inflation(self.inflation_rate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiInput {
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
    pub inflation_rate: Option<f64>,
}

impl Default for EmiInput {
    fn default() -> Self {
        Self {
            loan_amount: 1_000_000.0,
            interest_rate: 8.5,
            tenure: 20,
            inflation_rate: None,
        }
    }
}

impl EmiInput {
    pub fn clamped(self) -> Self {
        Self {
            loan_amount: EMI_LOAN.clamp("loan amount", self.loan_amount),
            interest_rate: EMI_RATE.clamp("interest rate", self.interest_rate),
            tenure: EMI_TENURE.clamp_years("tenure", self.tenure),
            inflation_rate: clamp_inflation(self.inflation_rate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CagrInput {
    pub initial_value: f64,
    pub final_value: f64,
    pub years: u32,
    pub inflation_rate: Option<f64>,
}

impl Default for CagrInput {
    fn default() -> Self {
        Self {
            initial_value: 100_000.0,
            final_value: 200_000.0,
            years: 5,
            inflation_rate: None,
        }
    }
}

impl CagrInput {
    pub fn clamped(self) -> Self {
        Self {
            initial_value: CAGR_VALUE.clamp("initial value", self.initial_value),
            final_value: CAGR_VALUE.clamp("final value", self.final_value),
            years: CAGR_YEARS.clamp_years("years", self.years),
            inflation_rate: clamp_inflation(self.inflation_rate),
        }
    }
}

/// Deduction claims with negative or non-finite amounts replaced by 0
pub fn sanitize_claims(claims: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    claims
        .into_iter()
        .map(|(key, amount)| {
            if amount.is_finite() && amount >= 0.0 {
                (key, amount)
            } else {
                warn!("deduction {} claimed {}, using 0", key, amount);
                (key, 0.0)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        assert_eq!(SipInput::default().clamped(), SipInput::default());
        assert_eq!(LumpSumInput::default().clamped(), LumpSumInput::default());
        assert_eq!(EmiInput::default().clamped(), EmiInput::default());
        assert_eq!(CagrInput::default().clamped(), CagrInput::default());
        assert_eq!(INFLATION.clamp("inflation", DEFAULT_INFLATION_PCT), 6.0);
    }

    #[test]
    fn test_sip_clamping() {
        let input = SipInput {
            monthly_investment: 50.0,
            annual_return: 45.0,
            years: 0,
            inflation_rate: Some(20.0),
        }
        .clamped();
        assert_eq!(input.monthly_investment, 100.0);
        assert_eq!(input.annual_return, 30.0);
        assert_eq!(input.years, 1);
        assert_eq!(input.inflation_rate, Some(15.0));
    }

    #[test]
    fn test_emi_tenure_cap() {
        let input = EmiInput {
            tenure: 40,
            loan_amount: 60_000_000.0,
            ..EmiInput::default()
        }
        .clamped();
        assert_eq!(input.tenure, 30);
        assert_eq!(input.loan_amount, 50_000_000.0);
    }

    #[test]
    fn test_nan_and_negative_inflation() {
        assert_eq!(LUMP_SUM_RETURN.clamp("r", f64::NAN), 1.0);
        let input = CagrInput {
            inflation_rate: Some(-2.0),
            ..CagrInput::default()
        }
        .clamped();
        assert_eq!(input.inflation_rate, Some(0.0));
    }

    #[test]
    fn test_sanitize_claims() {
        let claims = BTreeMap::from([
            ("section80C".to_string(), 150_000.0),
            ("hra".to_string(), -10.0),
            ("section80D".to_string(), f64::INFINITY),
        ]);
        let clean = sanitize_claims(claims);
        assert_eq!(clean["section80C"], 150_000.0);
        assert_eq!(clean["hra"], 0.0);
        assert_eq!(clean["section80D"], 0.0);
    }
}
