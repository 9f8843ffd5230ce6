//! Systematic Investment Plan (monthly contribution) growth

use serde::{Deserialize, Serialize};

use super::discount::{annuity_due_future_value, Inflation};

/// Maximum number of points in the monthly chart series
pub const SIP_SERIES_POINTS: u32 = 50;

/// One sampled month of the SIP projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipPoint {
    pub month: u32,
    pub invested: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_value: Option<f64>,
}

/// Complete SIP calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipResult {
    // Inputs
    pub monthly_investment: f64,
    pub annual_return: f64,
    pub years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,

    // Nominal outputs
    pub total_invested: f64,
    pub expected_returns: f64,
    pub maturity_value: f64,

    // Inflation-adjusted outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_total_invested: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_expected_returns: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_maturity_value: Option<f64>,

    pub monthly_data: Vec<SipPoint>,
}

/// Project a fixed monthly investment at an annual return over `years`.
///
/// # Arguments
/// * `monthly_investment` - Amount invested at the start of each month
/// * `annual_return_pct` - Expected annual return in percent (12.0 for 12%)
/// * `years` - Investment horizon in years
/// * `inflation_pct` - Optional annual inflation in percent for real figures
pub fn sip(
    monthly_investment: f64,
    annual_return_pct: f64,
    years: u32,
    inflation_pct: Option<f64>,
) -> SipResult {
    let monthly_rate = annual_return_pct / 100.0 / 12.0;
    let total_months = years * 12;

    let maturity_value = annuity_due_future_value(monthly_investment, monthly_rate, total_months);
    let total_invested = monthly_investment * total_months as f64;
    let expected_returns = maturity_value - total_invested;

    let inflation = Inflation::from_pct(inflation_pct);
    let real_monthly_rate = inflation.map(|i| i.real_rate(annual_return_pct / 100.0) / 12.0);

    let (real_total_invested, real_maturity_value, real_expected_returns) =
        match (inflation, real_monthly_rate) {
            (Some(inflation), Some(real_monthly)) => {
                let real_maturity =
                    annuity_due_future_value(monthly_investment, real_monthly, total_months);
                (
                    Some(inflation.discount_years(total_invested, years as f64)),
                    Some(real_maturity),
                    // Measured against the nominal amount invested
                    Some(real_maturity - total_invested),
                )
            }
            _ => (None, None, None),
        };

    let monthly_data = sample_months(total_months)
        .map(|month| SipPoint {
            month,
            invested: monthly_investment * month as f64,
            value: annuity_due_future_value(monthly_investment, monthly_rate, month),
            real_value: real_monthly_rate
                .map(|rate| annuity_due_future_value(monthly_investment, rate, month)),
        })
        .collect();

    SipResult {
        monthly_investment,
        annual_return: annual_return_pct,
        years,
        inflation_rate: inflation_pct,
        total_invested,
        expected_returns,
        maturity_value,
        real_total_invested,
        real_expected_returns,
        real_maturity_value,
        monthly_data,
    }
}

/// Months 1, 1 + stride, ... up to `total_months`, stride = ceil(n / 50)
fn sample_months(total_months: u32) -> impl Iterator<Item = u32> {
    let stride = total_months.div_ceil(SIP_SERIES_POINTS).max(1);
    (1..=total_months).step_by(stride as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_sip_known_value() {
        // 5,000/month at 12% for 10 years ≈ 11.6 lakh
        let result = sip(5_000.0, 12.0, 10, None);
        assert_abs_diff_eq!(result.total_invested, 600_000.0, epsilon = 1e-9);
        assert!((result.maturity_value - 1_161_695.38).abs() < 1.0,
            "maturity {}", result.maturity_value);
        assert!(result.real_maturity_value.is_none());
    }

    #[test]
    fn test_returns_identity() {
        let result = sip(2_500.0, 9.5, 17, Some(5.0));
        assert_eq!(result.maturity_value - result.total_invested, result.expected_returns);
        let real = result.real_maturity_value.unwrap();
        assert_eq!(real - result.total_invested, result.real_expected_returns.unwrap());
    }

    #[test]
    fn test_zero_return_is_linear() {
        let result = sip(1_000.0, 0.0, 5, None);
        assert!(result.maturity_value.is_finite());
        assert_abs_diff_eq!(result.maturity_value, 60_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.expected_returns, 0.0, epsilon = 1e-9);
        for point in &result.monthly_data {
            assert_abs_diff_eq!(point.value, point.invested, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_real_values() {
        let result = sip(5_000.0, 12.0, 10, Some(6.0));
        let real = result.real_maturity_value.unwrap();
        assert!(real < result.maturity_value);
        assert_relative_eq!(
            result.real_total_invested.unwrap(),
            600_000.0 / 1.06_f64.powi(10),
            max_relative = 1e-12
        );
        assert!(result.monthly_data.iter().all(|p| p.real_value.is_some()));
    }

    #[test]
    fn test_inflation_equal_to_return_does_not_divide_by_zero() {
        let result = sip(1_000.0, 6.0, 2, Some(6.0));
        assert_abs_diff_eq!(result.real_maturity_value.unwrap(), 24_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_series_is_bounded() {
        for years in [1, 4, 10, 25, 50] {
            let result = sip(100.0, 10.0, years, None);
            assert!(!result.monthly_data.is_empty());
            assert!(result.monthly_data.len() <= SIP_SERIES_POINTS as usize);
            assert_eq!(result.monthly_data[0].month, 1);
            assert!(result.monthly_data.last().unwrap().month <= years * 12);
        }

        // 12 months: every month sampled
        let result = sip(100.0, 10.0, 1, None);
        assert_eq!(result.monthly_data.len(), 12);
    }
}
