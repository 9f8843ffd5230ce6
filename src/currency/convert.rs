//! Amount conversion and request sequencing

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::rates::RateProvider;
use crate::error::CurrencyError;

/// Quiet period after the last input change before a conversion is requested
pub const DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub converted_amount: f64,
    /// Units of `to` per unit of `from`
    pub rate: f64,
    pub inverse_rate: f64,
    /// Date of the rate table used, empty for same-currency conversions
    pub last_updated: String,
}

/// Convert `amount` of `from` into `to` using the provider's latest table for
/// `from`. Converting a currency to itself never consults the provider.
pub fn convert<P: RateProvider + ?Sized>(
    provider: &P,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<ConversionResult, CurrencyError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CurrencyError::InvalidAmount(amount));
    }

    let from = from.to_uppercase();
    let to = to.to_uppercase();

    if from == to {
        return Ok(ConversionResult {
            from,
            to,
            amount,
            converted_amount: amount,
            rate: 1.0,
            inverse_rate: 1.0,
            last_updated: String::new(),
        });
    }

    let table = provider.latest(&from)?;
    let rate = table.rate_for(&to).ok_or_else(|| CurrencyError::RateNotFound {
        from: from.clone(),
        to: to.clone(),
    })?;
    debug!("{} -> {} at {} ({})", from, to, rate, table.date);

    Ok(ConversionResult {
        from,
        to,
        amount,
        converted_amount: amount * rate,
        rate,
        inverse_rate: 1.0 / rate,
        last_updated: table.date,
    })
}

/// Issued per conversion request; only the newest one may publish a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Drops responses that arrive after a newer request was issued
#[derive(Debug, Default)]
pub struct ConversionGuard {
    latest: u64,
    accepted: Option<ConversionResult>,
}

impl ConversionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Store `result` if `ticket` is still the newest; returns whether it was kept
    pub fn accept(&mut self, ticket: Ticket, result: ConversionResult) -> bool {
        if !self.is_current(ticket) {
            debug!("discarding stale conversion response {:?}", ticket);
            return false;
        }
        self.accepted = Some(result);
        true
    }

    pub fn current(&self) -> Option<&ConversionResult> {
        self.accepted.as_ref()
    }
}
