//! # Runtime Configuration Module
//!
//! Environment variable knobs for router construction.
//!
//! ## Environment Variables
//!
//! ### `BRRTM_SLOW_LOOKUP_US`
//!
//! Lookups taking longer than this many microseconds are logged at `WARN`
//! instead of `DEBUG`. Default: `1000` (1 ms).
//!
//! ### `BRRTM_CASE_SENSITIVE`
//!
//! `true`/`false` (also `1`/`0`, `yes`/`no`). When false, HTTP methods are
//! upper-cased before registration and lookup so `get` and `GET` select the
//! same routes. Paths and hosts are always compared byte-for-byte.
//! Default: `true`.
//!
//! ## Usage
//!
//! ```rust
//! use brrtmatch::runtime_config::RuntimeConfig;
//! use brrtmatch::router::{RouterBuilder, RouterOptions};
//!
//! let config = RuntimeConfig::from_env();
//! let builder: RouterBuilder<u32> = RouterBuilder::with_options(RouterOptions::from(&config));
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_SLOW_LOOKUP_US: u64 = 1_000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Threshold above which a lookup is reported as slow
    pub slow_lookup: Duration,
    /// Compare HTTP methods case-sensitively
    pub case_sensitive: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_lookup: Duration::from_micros(DEFAULT_SLOW_LOOKUP_US),
            case_sensitive: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with a custom variable source
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let slow_lookup = lookup("BRRTM_SLOW_LOOKUP_US")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map(Duration::from_micros)
            .unwrap_or(defaults.slow_lookup);

        let case_sensitive = lookup("BRRTM_CASE_SENSITIVE")
            .and_then(|val| parse_bool(&val))
            .unwrap_or(defaults.case_sensitive);

        RuntimeConfig {
            slow_lookup,
            case_sensitive,
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.slow_lookup, Duration::from_millis(1));
        assert!(config.case_sensitive);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BRRTM_SLOW_LOOKUP_US", "250"),
            ("BRRTM_CASE_SENSITIVE", "false"),
        ]);
        assert_eq!(config.slow_lookup, Duration::from_micros(250));
        assert!(!config.case_sensitive);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("BRRTM_SLOW_LOOKUP_US", "soon"),
            ("BRRTM_CASE_SENSITIVE", "maybe"),
        ]);
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("Off"), Some(false));
        assert_eq!(parse_bool(""), None);
    }
}
