//! One-time (lump sum) investment growth

use serde::{Deserialize, Serialize};

use super::discount::Inflation;

/// Value of the investment at the end of a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumPoint {
    pub year: u32,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumResult {
    pub principal: f64,
    pub annual_return: f64,
    pub years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,

    pub maturity_value: f64,
    pub total_returns: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_principal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_maturity_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_total_returns: Option<f64>,

    /// Years 0..=years
    pub yearly_data: Vec<LumpSumPoint>,
}

/// Compound `principal` annually at `annual_return_pct` for `years`
pub fn lump_sum(
    principal: f64,
    annual_return_pct: f64,
    years: u32,
    inflation_pct: Option<f64>,
) -> LumpSumResult {
    let rate = annual_return_pct / 100.0;
    let maturity_value = compound(principal, rate, years);
    let total_returns = maturity_value - principal;

    let real_rate = Inflation::from_pct(inflation_pct).map(|i| i.real_rate(rate));
    let real_maturity_value = real_rate.map(|r| compound(principal, r, years));

    let yearly_data = (0..=years)
        .map(|year| LumpSumPoint {
            year,
            value: compound(principal, rate, year),
            real_value: real_rate.map(|r| compound(principal, r, year)),
        })
        .collect();

    LumpSumResult {
        principal,
        annual_return: annual_return_pct,
        years,
        inflation_rate: inflation_pct,
        maturity_value,
        total_returns,
        real_principal: real_rate.map(|_| principal),
        real_maturity_value,
        real_total_returns: real_maturity_value.map(|v| v - principal),
        yearly_data,
    }
}

fn compound(principal: f64, rate: f64, years: u32) -> f64 {
    principal * (1.0 + rate).powi(years as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lump_sum_basic() {
        let result = lump_sum(100_000.0, 12.0, 10, None);
        assert_relative_eq!(result.maturity_value, 100_000.0 * 1.12_f64.powi(10), max_relative = 1e-12);
        assert_relative_eq!(result.total_returns, result.maturity_value - 100_000.0, max_relative = 1e-12);
        assert_eq!(result.yearly_data.len(), 11);
        assert_eq!(result.yearly_data[0].value, 100_000.0);
        assert!(result.real_maturity_value.is_none());
    }

    #[test]
    fn test_maturity_exceeds_principal_and_grows_with_years() {
        for &(principal, rate) in &[(1_000.0, 1.0), (50_000.0, 7.5), (10_000_000.0, 30.0)] {
            let mut previous = principal;
            for years in 1..=50 {
                let result = lump_sum(principal, rate, years, None);
                assert!(result.maturity_value > principal);
                assert!(result.maturity_value > previous);
                previous = result.maturity_value;
            }
        }
    }

    #[test]
    fn test_real_variant() {
        let result = lump_sum(100_000.0, 12.0, 10, Some(6.0));
        let real_rate = 1.12 / 1.06 - 1.0;
        assert_relative_eq!(
            result.real_maturity_value.unwrap(),
            100_000.0 * (1.0_f64 + real_rate).powi(10),
            max_relative = 1e-12
        );
        assert_eq!(result.real_principal, Some(100_000.0));
        assert!(result.yearly_data.iter().all(|p| p.real_value.unwrap() <= p.value));
    }
}
