//! Currency conversion against pluggable rate providers

mod rates;
mod cache;
mod convert;
mod history;

pub use rates::{ExchangeRates, RateProvider, StaticRateProvider};
pub use cache::{CachedRateProvider, RateCache, DEFAULT_RATE_TTL_SECS};
pub use convert::{convert, ConversionGuard, ConversionResult, Ticket, DEBOUNCE};
pub use history::{os_noise, synthetic_history, HistoricalRate, DEFAULT_HISTORY_DAYS};
