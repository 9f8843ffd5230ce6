//! Runtime settings and persisted user preferences
//!
//! Settings come from the environment:
//!
//! | Variable              | Default                          |
//! |-----------------------|----------------------------------|
//! | `FIN_CURRENCY`        | `INR`                            |
//! | `FIN_RATES_FILE`      | unset (conversion needs `--rates`) |
//! | `FIN_RATE_CACHE_SECS` | `600` (1 to 86400)               |
//! | `FIN_CACHE_CAPACITY`  | `100`                            |
//! | `FIN_PREFS_PATH`      | `.fin_toolkit/preferences.json`  |

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::currency::DEFAULT_RATE_TTL_SECS;
use crate::error::ConfigError;
use crate::format::Currency;

pub const DEFAULT_PREFS_PATH: &str = ".fin_toolkit/preferences.json";

/// Longest accepted rate cache lifetime (one day)
pub const MAX_RATE_CACHE_SECS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Display currency when no preference is stored
    pub currency: String,
    pub rates_file: Option<PathBuf>,
    pub rate_cache_secs: i64,
    pub cache_capacity: usize,
    pub prefs_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: Currency::default().code,
            rates_file: None,
            rate_cache_secs: DEFAULT_RATE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            prefs_path: PathBuf::from(DEFAULT_PREFS_PATH),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let currency = match lookup("FIN_CURRENCY") {
            Some(code) => match Currency::find(&code) {
                Some(currency) => currency.code,
                None => {
                    return Err(ConfigError::InvalidValue {
                        key: "FIN_CURRENCY".to_string(),
                        value: code,
                    })
                }
            },
            None => defaults.currency,
        };

        let rate_cache_secs = parse_or(&lookup, "FIN_RATE_CACHE_SECS", defaults.rate_cache_secs)?;
        if !(1..=MAX_RATE_CACHE_SECS).contains(&rate_cache_secs) {
            return Err(ConfigError::InvalidValue {
                key: "FIN_RATE_CACHE_SECS".to_string(),
                value: rate_cache_secs.to_string(),
            });
        }
        let cache_capacity = parse_or(&lookup, "FIN_CACHE_CAPACITY", defaults.cache_capacity)?;

        Ok(Self {
            currency,
            rates_file: lookup("FIN_RATES_FILE").map(PathBuf::from),
            rate_cache_secs,
            cache_capacity,
            prefs_path: lookup("FIN_PREFS_PATH").map(PathBuf::from).unwrap_or(defaults.prefs_path),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

/// User choices that survive between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub currency: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency: Currency::default().code,
        }
    }
}

impl Preferences {
    /// Load preferences from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The stored currency, or the default one if the code is not supported
    pub fn currency(&self) -> Currency {
        Currency::find(&self.currency).unwrap_or_else(|| {
            warn!("unsupported stored currency {}, using default", self.currency);
            Currency::default()
        })
    }

    /// Select a supported currency by code
    pub fn set_currency(&mut self, code: &str) -> Result<(), ConfigError> {
        let currency = Currency::find(code).ok_or_else(|| ConfigError::InvalidValue {
            key: "currency".to_string(),
            value: code.to_string(),
        })?;
        self.currency = currency.code;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.currency, "INR");
        assert_eq!(settings.rate_cache_secs, 600);
        assert_eq!(settings.cache_capacity, 100);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("FIN_CURRENCY", "usd"),
            ("FIN_RATES_FILE", "rates.json"),
            ("FIN_RATE_CACHE_SECS", "30"),
            ("FIN_CACHE_CAPACITY", " 8 "),
        ]))
        .unwrap();
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.rates_file, Some(PathBuf::from("rates.json")));
        assert_eq!(settings.rate_cache_secs, 30);
        assert_eq!(settings.cache_capacity, 8);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Settings::from_lookup(lookup_from(&[("FIN_CACHE_CAPACITY", "lots")])),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "FIN_CACHE_CAPACITY"
        ));
        assert!(Settings::from_lookup(lookup_from(&[("FIN_CURRENCY", "XYZ")])).is_err());
    }

    #[test]
    fn test_rate_cache_secs_range() {
        for raw in ["0", "-30", "86401", "9223372036854775807"] {
            assert!(
                matches!(
                    Settings::from_lookup(lookup_from(&[("FIN_RATE_CACHE_SECS", raw)])),
                    Err(ConfigError::InvalidValue { ref key, .. }) if key == "FIN_RATE_CACHE_SECS"
                ),
                "{} should be rejected",
                raw
            );
        }
        let settings = Settings::from_lookup(lookup_from(&[("FIN_RATE_CACHE_SECS", "86400")])).unwrap();
        assert_eq!(settings.rate_cache_secs, MAX_RATE_CACHE_SECS);
    }

    #[test]
    fn test_preferences_round_trip() {
        let dir = std::env::temp_dir().join(format!("fin_toolkit_prefs_{}", std::process::id()));
        let path = dir.join("nested").join("preferences.json");

        assert_eq!(Preferences::load(&path).unwrap(), Preferences::default());

        let mut prefs = Preferences::default();
        prefs.set_currency("chf").unwrap();
        prefs.save(&path).unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded.currency, "CHF");
        assert_eq!(loaded.currency().symbol, "CHF");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_stored_currency_falls_back() {
        let prefs = Preferences {
            currency: "DOGE".to_string(),
        };
        assert_eq!(prefs.currency(), Currency::default());

        let mut prefs = Preferences::default();
        assert!(prefs.set_currency("DOGE").is_err());
        assert_eq!(prefs.currency, "INR");
    }
}
