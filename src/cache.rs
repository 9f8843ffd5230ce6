//! Memoization of calculator results
//!
//! Every calculator is a pure function of its inputs, so a result computed once
//! can be served again for the same input tuple. Caches are plain owned values:
//! whoever needs memoization holds a [`Calculator`] (or a bare
//! [`CalculationCache`]) and passes it around explicitly.

use log::debug;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::growth::{cagr, emi, lump_sum, sip, CagrResult, EmiResult, LumpSumResult, SipResult};

/// Entries kept per calculator before the oldest is evicted
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Bounded map with first-in first-out eviction and hit/miss statistics
#[derive(Debug, Clone)]
pub struct CalculationCache<K, V> {
    entries: HashMap<K, V>,
    /// Insertion order, oldest first
    order: VecDeque<K>,
    capacity: usize,

    /// Statistics
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> CalculationCache<K, V> {
    /// Create a cache holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Store a value, evicting the oldest entry when full
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Cached value for `key`, computing and storing it on a miss
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, compute: F) -> V {
        if let Some(value) = self.entries.get(&key) {
            self.cache_hits += 1;
            return value.clone();
        }
        self.cache_misses += 1;
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Clear all cached data
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// Bit patterns of the float inputs; `None` inflation gets its own key
type GrowthKey = (u64, u64, u32, Option<u64>);

fn growth_key(a: f64, b: f64, years: u32, inflation_pct: Option<f64>) -> GrowthKey {
    (a.to_bits(), b.to_bits(), years, inflation_pct.map(f64::to_bits))
}

/// Growth calculators with one result cache per calculator kind
#[derive(Debug, Clone)]
pub struct Calculator {
    sip: CalculationCache<GrowthKey, SipResult>,
    lump_sum: CalculationCache<GrowthKey, LumpSumResult>,
    emi: CalculationCache<GrowthKey, EmiResult>,
    cagr: CalculationCache<GrowthKey, CagrResult>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sip: CalculationCache::new(capacity),
            lump_sum: CalculationCache::new(capacity),
            emi: CalculationCache::new(capacity),
            cagr: CalculationCache::new(capacity),
        }
    }

    pub fn sip(&mut self, monthly_investment: f64, annual_return_pct: f64, years: u32, inflation_pct: Option<f64>) -> SipResult {
        let key = growth_key(monthly_investment, annual_return_pct, years, inflation_pct);
        self.sip.get_or_insert_with(key, || {
            debug!("sip cache miss");
            sip(monthly_investment, annual_return_pct, years, inflation_pct)
        })
    }

    pub fn lump_sum(&mut self, principal: f64, annual_return_pct: f64, years: u32, inflation_pct: Option<f64>) -> LumpSumResult {
        let key = growth_key(principal, annual_return_pct, years, inflation_pct);
        self.lump_sum.get_or_insert_with(key, || {
            debug!("lump sum cache miss");
            lump_sum(principal, annual_return_pct, years, inflation_pct)
        })
    }

    pub fn emi(&mut self, loan_amount: f64, annual_interest_pct: f64, tenure_years: u32, inflation_pct: Option<f64>) -> EmiResult {
        let key = growth_key(loan_amount, annual_interest_pct, tenure_years, inflation_pct);
        self.emi.get_or_insert_with(key, || {
            debug!("emi cache miss");
            emi(loan_amount, annual_interest_pct, tenure_years, inflation_pct)
        })
    }

    pub fn cagr(&mut self, initial_value: f64, final_value: f64, years: u32, inflation_pct: Option<f64>) -> CagrResult {
        let key = growth_key(initial_value, final_value, years, inflation_pct);
        self.cagr.get_or_insert_with(key, || {
            debug!("cagr cache miss");
            cagr(initial_value, final_value, years, inflation_pct)
        })
    }

    /// Combined (hits, misses) across all calculators
    pub fn stats(&self) -> (u64, u64) {
        let hits = self.sip.cache_hits + self.lump_sum.cache_hits + self.emi.cache_hits + self.cagr.cache_hits;
        let misses =
            self.sip.cache_misses + self.lump_sum.cache_misses + self.emi.cache_misses + self.cagr.cache_misses;
        (hits, misses)
    }

    pub fn clear(&mut self) {
        self.sip.clear();
        self.lump_sum.clear();
        self.emi.clear();
        self.cagr.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut cache: CalculationCache<u32, &str> = CalculationCache::new(2);
        cache.insert(1, "one");
        cache.insert(2, "two");
        cache.insert(1, "uno");
        assert_eq!(cache.len(), 2);

        cache.insert(3, "three");
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&1).is_none());
        assert_eq!(cache.get(&2), Some(&"two"));
        assert_eq!(cache.get(&3), Some(&"three"));
    }

    #[test]
    fn test_hit_rate() {
        let mut cache = CalculationCache::new(10);
        assert_eq!(cache.hit_rate(), 0.0);

        let mut computed = 0;
        for _ in 0..4 {
            cache.get_or_insert_with("k", || {
                computed += 1;
                42
            });
        }
        assert_eq!(computed, 1);
        assert_eq!(cache.cache_hits, 3);
        assert_eq!(cache.cache_misses, 1);
        assert_eq!(cache.hit_rate(), 0.75);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.cache_hits, 0);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache = CalculationCache::new(0);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.get(&"b"), Some(&2));
    }

    #[test]
    fn test_calculator_memoizes_per_input() {
        let mut calc = Calculator::new();
        let first = calc.sip(5_000.0, 12.0, 10, None);
        let again = calc.sip(5_000.0, 12.0, 10, None);
        assert_eq!(first, again);
        assert_eq!(calc.stats(), (1, 1));

        // Inflation is part of the key
        let real = calc.sip(5_000.0, 12.0, 10, Some(6.0));
        assert!(real.real_maturity_value.is_some());
        assert_eq!(calc.stats(), (1, 2));

        calc.emi(1_000_000.0, 8.5, 20, None);
        calc.lump_sum(100_000.0, 12.0, 10, None);
        calc.cagr(100_000.0, 200_000.0, 5, None);
        calc.cagr(100_000.0, 200_000.0, 5, None);
        assert_eq!(calc.stats(), (2, 5));

        calc.clear();
        assert_eq!(calc.stats(), (0, 0));
    }

    #[test]
    fn test_cached_matches_direct() {
        let mut calc = Calculator::with_capacity(4);
        assert_eq!(calc.emi(500_000.0, 9.0, 5, Some(5.0)), emi(500_000.0, 9.0, 5, Some(5.0)));
        assert_eq!(calc.lump_sum(10_000.0, 7.0, 3, None), lump_sum(10_000.0, 7.0, 3, None));
    }
}
