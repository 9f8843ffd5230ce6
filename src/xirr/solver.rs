//! Extended Internal Rate of Return (XIRR) for irregularly dated cash flows
//!
//! Year fractions are measured from the earliest flow in 365.25-day years and
//! the rate is found with Newton-Raphson. Failure to converge is reported as
//! an error rather than a default rate.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cashflow::CashFlow;
use crate::error::XirrError;

/// Days per year used for year fractions
pub const DAYS_PER_YEAR: f64 = 365.25;

const INITIAL_GUESS: f64 = 0.10;
const TOLERANCE: f64 = 1e-6;
const MAX_ITERATIONS: u32 = 100;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Running totals after each flow, in date order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub cumulative_investment: f64,
    pub cumulative_returns: f64,
    pub net_position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XirrResult {
    /// Flows sorted ascending by date
    pub cash_flows: Vec<CashFlow>,
    /// Annualized rate in percent
    pub xirr: f64,
    pub total_invested: f64,
    pub total_returned: f64,
    pub net_gain: f64,
    pub net_gain_percent: f64,
    /// Years between the first and last flow
    pub duration: f64,
    pub annualized_return: f64,
    /// Newton-Raphson steps taken
    pub iterations: u32,
    pub cumulative_data: Vec<CumulativePoint>,
}

/// Solve for the annual rate at which the flows' net present value is zero.
pub fn xirr(cash_flows: &[CashFlow]) -> Result<XirrResult, XirrError> {
    if cash_flows.len() < 2 {
        return Err(XirrError::InvalidInput(
            "at least 2 cash flows are required".to_string(),
        ));
    }

    let mut sorted = cash_flows.to_vec();
    sorted.sort_by_key(|cf| cf.date);

    let has_positive = sorted.iter().any(|cf| cf.amount > 0.0);
    let has_negative = sorted.iter().any(|cf| cf.amount < 0.0);
    if !has_positive || !has_negative {
        return Err(XirrError::InvalidInput(
            "both positive and negative cash flows are required".to_string(),
        ));
    }

    let origin = sorted[0].date;
    let timed: Vec<(f64, f64)> = sorted
        .iter()
        .map(|cf| (year_fraction(origin, cf.date), cf.amount))
        .collect();

    let (rate, iterations) = solve_newton(&timed, MAX_ITERATIONS)?;
    let xirr = rate * 100.0;

    let total_invested: f64 = sorted
        .iter()
        .filter(|cf| cf.amount < 0.0)
        .map(|cf| cf.amount.abs())
        .sum();
    let total_returned: f64 = sorted
        .iter()
        .filter(|cf| cf.amount > 0.0)
        .map(|cf| cf.amount)
        .sum();
    let net_gain = total_returned - total_invested;
    let net_gain_percent = net_gain / total_invested * 100.0;

    let last = sorted[sorted.len() - 1].date;
    let duration = year_fraction(origin, last);

    let mut cumulative_investment = 0.0;
    let mut cumulative_returns = 0.0;
    let cumulative_data = sorted
        .iter()
        .map(|cf| {
            if cf.amount < 0.0 {
                cumulative_investment += cf.amount.abs();
            } else {
                cumulative_returns += cf.amount;
            }
            CumulativePoint {
                date: cf.date,
                cumulative_investment,
                cumulative_returns,
                net_position: cumulative_returns - cumulative_investment,
            }
        })
        .collect();

    Ok(XirrResult {
        cash_flows: sorted,
        xirr,
        total_invested,
        total_returned,
        net_gain,
        net_gain_percent,
        duration,
        annualized_return: xirr,
        iterations,
        cumulative_data,
    })
}

/// Net present value of dated flows at an annual `rate` (decimal), discounted
/// to the earliest flow's date
pub fn npv(cash_flows: &[CashFlow], rate: f64) -> f64 {
    let Some(origin) = cash_flows.iter().map(|cf| cf.date).min() else {
        return 0.0;
    };

    cash_flows
        .iter()
        .map(|cf| cf.amount / (1.0 + rate).powf(year_fraction(origin, cf.date)))
        .sum()
}

/// Newton-Raphson from 10% for at most `max_iterations` steps; returns
/// (rate, iterations)
fn solve_newton(timed: &[(f64, f64)], max_iterations: u32) -> Result<(f64, u32), XirrError> {
    let mut rate = INITIAL_GUESS;

    for iteration in 1..=max_iterations {
        let (value, derivative) = npv_and_derivative(timed, rate);
        debug!(
            "xirr iteration {}: rate={:.8} npv={:.6e} dnpv={:.6e}",
            iteration, rate, value, derivative
        );

        if value.abs() < TOLERANCE {
            return Ok((rate, iteration));
        }

        if derivative.abs() < TOLERANCE {
            warn!("xirr derivative vanished at rate {:.6}", rate);
            return Err(XirrError::NonConvergent {
                reason: "derivative too small".to_string(),
                iterations: iteration,
            });
        }

        let new_rate = rate - value / derivative;

        if !new_rate.is_finite() || new_rate <= MIN_RATE || new_rate >= MAX_RATE {
            warn!("xirr left the admissible band: rate {:.6}", new_rate);
            return Err(XirrError::NonConvergent {
                reason: format!("rate {:.4} outside ({}, {})", new_rate, MIN_RATE, MAX_RATE),
                iterations: iteration,
            });
        }

        if (new_rate - rate).abs() < TOLERANCE {
            return Ok((new_rate, iteration));
        }

        rate = new_rate;
    }

    warn!("xirr exhausted {} iterations at rate {:.6}", max_iterations, rate);
    Err(XirrError::NonConvergent {
        reason: "iteration limit reached".to_string(),
        iterations: max_iterations,
    })
}

/// NPV and its derivative with respect to the rate
fn npv_and_derivative(timed: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for &(t, amount) in timed {
        npv += amount / (1.0 + rate).powf(t);
        dnpv -= t * amount / (1.0 + rate).powf(t + 1.0);
    }

    (npv, dnpv)
}

fn year_fraction(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64 / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    #[test]
    fn test_simple_two_flow_xirr() {
        let flows = vec![CashFlow::new(day(0), -100_000.0), CashFlow::new(day(365), 120_000.0)];

        let result = xirr(&flows).unwrap();
        assert_abs_diff_eq!(result.xirr / 100.0, 0.20, epsilon = 0.01);
        assert_abs_diff_eq!(npv(&flows, result.xirr / 100.0), 0.0, epsilon = 1e-3);
        assert_eq!(result.total_invested, 100_000.0);
        assert_eq!(result.total_returned, 120_000.0);
        assert_eq!(result.net_gain, 20_000.0);
        assert_abs_diff_eq!(result.net_gain_percent, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.duration, 365.0 / 365.25, epsilon = 1e-12);
        assert_eq!(result.annualized_return, result.xirr);
    }

    #[test]
    fn test_flows_are_sorted_and_accumulated() {
        let flows = vec![
            CashFlow::new(day(730), 70_000.0).with_description("redeem"),
            CashFlow::new(day(0), -30_000.0),
            CashFlow::new(day(180), -30_000.0),
            CashFlow::new(day(400), 5_000.0),
        ];

        let result = xirr(&flows).unwrap();
        let dates: Vec<_> = result.cash_flows.iter().map(|cf| cf.date).collect();
        assert_eq!(dates, vec![day(0), day(180), day(400), day(730)]);

        let last = result.cumulative_data.last().unwrap();
        assert_eq!(last.cumulative_investment, 60_000.0);
        assert_eq!(last.cumulative_returns, 75_000.0);
        assert_eq!(last.net_position, 15_000.0);
        assert_eq!(result.cumulative_data[1].net_position, -60_000.0);
        assert!(result.xirr > 0.0);
    }

    #[test]
    fn test_negative_return() {
        let flows = vec![CashFlow::new(day(0), -10_000.0), CashFlow::new(day(730), 8_100.0)];
        let result = xirr(&flows).unwrap();
        // 0.81 over ~2 years ≈ -10% a year
        assert_abs_diff_eq!(result.xirr, -10.0, epsilon = 0.1);
    }

    #[test]
    fn test_invalid_input() {
        let one = vec![CashFlow::new(day(0), -100.0)];
        assert!(matches!(xirr(&one), Err(XirrError::InvalidInput(_))));

        let all_negative = vec![CashFlow::new(day(0), -100.0), CashFlow::new(day(30), -50.0)];
        assert!(matches!(xirr(&all_negative), Err(XirrError::InvalidInput(_))));

        let all_positive = vec![CashFlow::new(day(0), 100.0), CashFlow::new(day(30), 50.0)];
        assert!(matches!(xirr(&all_positive), Err(XirrError::InvalidInput(_))));
    }

    #[test]
    fn test_flat_derivative_is_non_convergent() {
        // Same-day flows: every year fraction is zero, so NPV' is zero
        let flows = vec![CashFlow::new(day(0), -100.0), CashFlow::new(day(0), 50.0)];
        match xirr(&flows) {
            Err(XirrError::NonConvergent { iterations, .. }) => assert_eq!(iterations, 1),
            other => panic!("expected NonConvergent, got {:?}", other),
        }
    }

    #[test]
    fn test_iteration_limit_is_non_convergent() {
        // One year apart, root at 20%; two steps from 10% are not enough
        let timed = [(0.0, -100.0), (1.0, 120.0)];
        match solve_newton(&timed, 2) {
            Err(XirrError::NonConvergent { iterations, reason }) => {
                assert_eq!(iterations, 2);
                assert_eq!(reason, "iteration limit reached");
            }
            other => panic!("expected NonConvergent, got {:?}", other),
        }

        let (rate, iterations) = solve_newton(&timed, MAX_ITERATIONS).unwrap();
        assert_abs_diff_eq!(rate, 0.20, epsilon = 1e-6);
        assert!(iterations > 2 && iterations < MAX_ITERATIONS);
    }

    #[test]
    fn test_rate_leaving_band_is_non_convergent() {
        let flows = vec![CashFlow::new(day(0), -1.0), CashFlow::new(day(1), 1_000_000.0)];
        assert!(matches!(xirr(&flows), Err(XirrError::NonConvergent { .. })));
    }
}
