//! Compound Annual Growth Rate between two values

use serde::{Deserialize, Serialize};

use super::discount::Inflation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrPoint {
    pub year: u32,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_value: Option<f64>,
    /// Growth over the previous year, 0 at year 0
    pub annual_returns: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrResult {
    pub initial_value: f64,
    pub final_value: f64,
    pub years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,

    /// Annual growth rate in percent
    pub cagr: f64,
    pub total_growth_percent: f64,
    pub absolute_returns: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_cagr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_final_value: Option<f64>,

    pub yearly_projection: Vec<CagrPoint>,
}

/// Annualized growth from `initial_value` to `final_value` over `years`.
/// Inputs are expected to be positive (clamped by the caller).
pub fn cagr(
    initial_value: f64,
    final_value: f64,
    years: u32,
    inflation_pct: Option<f64>,
) -> CagrResult {
    let cagr = ((final_value / initial_value).powf(1.0 / years as f64) - 1.0) * 100.0;
    let total_growth_percent = (final_value - initial_value) / initial_value * 100.0;
    let absolute_returns = final_value - initial_value;

    let inflation = Inflation::from_pct(inflation_pct);
    let growth = cagr / 100.0;
    let real_growth = inflation.map(|i| i.real_rate(growth));
    let real_final_value = inflation.map(|i| i.discount_years(final_value, years as f64));

    let value_at = |rate: f64, year: u32| initial_value * (1.0 + rate).powi(year as i32);

    let yearly_projection = (0..=years)
        .map(|year| {
            let value = value_at(growth, year);
            CagrPoint {
                year,
                value,
                real_value: real_growth.map(|r| value_at(r, year)),
                annual_returns: if year == 0 {
                    0.0
                } else {
                    value - value_at(growth, year - 1)
                },
            }
        })
        .collect();

    CagrResult {
        initial_value,
        final_value,
        years,
        inflation_rate: inflation_pct,
        cagr,
        total_growth_percent,
        absolute_returns,
        real_cagr: real_growth.map(|r| r * 100.0),
        real_final_value,
        yearly_projection,
    }
}
