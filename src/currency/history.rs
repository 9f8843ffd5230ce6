//! Placeholder rate history for charting
//!
//! No historical rates endpoint is consulted. The series scatters the current
//! rate by up to ±5% per day so a trend chart has something to draw.

use chrono::{Duration, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};

/// Trailing window used when no length is given
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Largest relative deviation from the current rate
const MAX_FLUCTUATION: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRate {
    pub date: NaiveDate,
    pub rate: f64,
}

/// `days` daily points ending at `end_date`, oldest first.
///
/// `noise` must yield values in `[0, 1)`; 0.5 leaves the rate unchanged.
pub fn synthetic_history<F>(current_rate: f64, days: u32, end_date: NaiveDate, mut noise: F) -> Vec<HistoricalRate>
where
    F: FnMut() -> f64,
{
    (0..days)
        .rev()
        .map(|days_back| {
            let fluctuation = (noise().clamp(0.0, 1.0) - 0.5) * 2.0 * MAX_FLUCTUATION;
            let rate = current_rate * (1.0 + fluctuation);
            HistoricalRate {
                date: end_date - Duration::days(i64::from(days_back)),
                rate: (rate * 1e6).round() / 1e6,
            }
        })
        .collect()
}

/// Uniform sample in `[0, 1)` from the operating system's generator
pub fn os_noise() -> f64 {
    let mut buf = [0u8; 8];
    match getrandom::fill(&mut buf) {
        // Top 53 bits fill an f64 mantissa exactly
        Ok(()) => (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64,
        Err(err) => {
            warn!("OS randomness unavailable ({}), history will be flat", err);
            0.5
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_and_dates() {
        let history = synthetic_history(83.0, DEFAULT_HISTORY_DAYS, day(2024, 3, 10), || 0.5);
        assert_eq!(history.len(), 30);
        assert_eq!(history[0].date, day(2024, 2, 10));
        assert_eq!(history[29].date, day(2024, 3, 10));
        assert!(history.iter().all(|h| h.rate == 83.0));
    }

    #[test]
    fn test_fluctuation_bounds() {
        let low = synthetic_history(1.0, 3, day(2024, 1, 1), || 0.0);
        assert!(low.iter().all(|h| h.rate == 0.95));

        let mut samples = [0.999_999, 0.25, 0.75].into_iter();
        let mixed = synthetic_history(0.012345, 3, day(2024, 1, 1), || samples.next().unwrap_or(0.5));
        for point in &mixed {
            assert!(point.rate >= 0.012345 * 0.95 - 1e-6);
            assert!(point.rate <= 0.012345 * 1.05 + 1e-6);
            // Six decimal places
            assert_eq!((point.rate * 1e6).round() / 1e6, point.rate);
        }
    }

    #[test]
    fn test_os_noise_range() {
        for _ in 0..100 {
            let sample = os_noise();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn test_zero_days() {
        assert!(synthetic_history(1.0, 0, day(2024, 1, 1), os_noise).is_empty());
    }
}
