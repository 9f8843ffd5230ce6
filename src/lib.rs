//! Personal finance toolkit - closed-form calculators for everyday money questions
//!
//! This library provides:
//! - SIP, lump-sum, EMI and CAGR growth models with optional inflation adjustment
//! - XIRR for irregular dated cash flows (Newton-Raphson)
//! - Progressive income tax for built-in or CSV-defined jurisdictions
//! - Currency conversion against pluggable, cached rate providers
//! - Locale-aware currency formatting

pub mod growth;
pub mod xirr;
pub mod tax;
pub mod currency;
pub mod format;
pub mod cache;
pub mod inputs;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use growth::{cagr, emi, lump_sum, sip, CagrResult, EmiResult, LumpSumResult, SipResult};
pub use xirr::{xirr, CashFlow, XirrResult};
pub use tax::{calculate_income_tax, Jurisdiction, TaxCalculation};
pub use currency::{convert, ConversionResult, RateProvider, StaticRateProvider};
pub use format::{format_currency, format_currency_compact, Currency};
pub use cache::{CalculationCache, Calculator};
pub use config::{Preferences, Settings};
pub use error::{ConfigError, CurrencyError, LoadError, TaxError, XirrError};
