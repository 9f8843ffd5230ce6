//! Time-to-live cache for rate tables

use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;

use super::rates::{ExchangeRates, RateProvider};
use crate::error::CurrencyError;

/// Rate tables stay fresh for ten minutes unless configured otherwise
pub const DEFAULT_RATE_TTL_SECS: i64 = 600;

#[derive(Debug, Clone)]
struct CachedRates {
    rates: ExchangeRates,
    fetched_at: DateTime<Utc>,
}

/// Rate tables keyed by base currency, each valid for `ttl` after it was stored
#[derive(Debug, Clone)]
pub struct RateCache {
    entries: HashMap<String, CachedRates>,
    ttl: Duration,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl Default for RateCache {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_RATE_TTL_SECS))
    }
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh table for `base` as of `now`; expired entries count as misses
    pub fn get(&mut self, base: &str, now: DateTime<Utc>) -> Option<ExchangeRates> {
        let key = base.to_uppercase();
        match self.entries.get(&key) {
            Some(entry) if now - entry.fetched_at < self.ttl => {
                self.cache_hits += 1;
                Some(entry.rates.clone())
            }
            Some(_) => {
                self.entries.remove(&key);
                self.cache_misses += 1;
                None
            }
            None => {
                self.cache_misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, base: &str, rates: ExchangeRates, now: DateTime<Utc>) {
        self.entries.insert(
            base.to_uppercase(),
            CachedRates {
                rates,
                fetched_at: now,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Wraps a provider so each base currency is fetched at most once per TTL
#[derive(Debug)]
pub struct CachedRateProvider<P> {
    inner: P,
    cache: RefCell<RateCache>,
}

impl<P: RateProvider> CachedRateProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_cache(inner, RateCache::new())
    }

    pub fn with_cache(inner: P, cache: RateCache) -> Self {
        Self {
            inner,
            cache: RefCell::new(cache),
        }
    }

    /// Rates for `base`, served from the cache when fresh as of `now`
    pub fn latest_at(&self, base: &str, now: DateTime<Utc>) -> Result<ExchangeRates, CurrencyError> {
        if let Some(rates) = self.cache.borrow_mut().get(base, now) {
            debug!("rate cache hit for {}", base);
            return Ok(rates);
        }

        debug!("rate cache miss for {}, fetching", base);
        let rates = self.inner.latest(base)?;
        self.cache.borrow_mut().insert(base, rates.clone(), now);
        Ok(rates)
    }

    /// (hits, misses) so far
    pub fn stats(&self) -> (u64, u64) {
        let cache = self.cache.borrow();
        (cache.cache_hits, cache.cache_misses)
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: RateProvider> RateProvider for CachedRateProvider<P> {
    fn latest(&self, base: &str) -> Result<ExchangeRates, CurrencyError> {
        self.latest_at(base, Utc::now())
    }
}
