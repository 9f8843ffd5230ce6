//! Exchange-rate documents and the providers that supply them

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CurrencyError, LoadError};

/// Latest rates quoted against one base currency, as returned by the rates
/// endpoint: `{ "base": "USD", "date": "2024-05-01", "rates": { "EUR": 0.93 } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    pub date: String,
    pub rates: BTreeMap<String, f64>,
}

impl ExchangeRates {
    /// Units of `to` per unit of the base currency
    pub fn rate_for(&self, to: &str) -> Option<f64> {
        self.rates
            .get(to)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}

/// Source of exchange rates by base currency
pub trait RateProvider {
    fn latest(&self, base: &str) -> Result<ExchangeRates, CurrencyError>;
}

impl<P: RateProvider + ?Sized> RateProvider for &P {
    fn latest(&self, base: &str) -> Result<ExchangeRates, CurrencyError> {
        (**self).latest(base)
    }
}

/// In-memory rate tables, optionally loaded from a JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    tables: HashMap<String, ExchangeRates>,
}

impl StaticRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the table for `rates.base`
    pub fn insert(&mut self, rates: ExchangeRates) {
        self.tables.insert(rates.base.to_uppercase(), rates);
    }

    /// Load from a JSON file holding either one rates document or an array of them
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, LoadError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Many(Vec<ExchangeRates>),
            One(ExchangeRates),
        }

        let mut provider = Self::new();
        match serde_json::from_reader(reader)? {
            Document::Many(tables) => tables.into_iter().for_each(|t| provider.insert(t)),
            Document::One(table) => provider.insert(table),
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl RateProvider for StaticRateProvider {
    fn latest(&self, base: &str) -> Result<ExchangeRates, CurrencyError> {
        let key = base.to_uppercase();
        if let Some(table) = self.tables.get(&key) {
            return Ok(table.clone());
        }

        // Derive a table by inverting/crossing through any loaded base
        for table in self.tables.values() {
            if let Some(base_in_table) = table.rate_for(&key) {
                debug!("deriving {} rates from {} table", key, table.base);
                let rates = table
                    .rates
                    .iter()
                    .filter(|(code, rate)| **code != key && **rate > 0.0)
                    .map(|(code, rate)| (code.clone(), rate / base_in_table))
                    .chain(std::iter::once((table.base.to_uppercase(), 1.0 / base_in_table)))
                    .collect();
                return Ok(ExchangeRates {
                    base: key,
                    date: table.date.clone(),
                    rates,
                });
            }
        }

        Err(CurrencyError::UnknownBase(key))
    }
}
