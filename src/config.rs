//! Runtime configuration read from the environment.
//!
//! - `RED_OR_BLACK_SEED`: u64 seed for shuffles and dealer choice
//! - `RED_OR_BLACK_LOG`: file to write logs to (no logging when unset)
//! - `RED_OR_BLACK_FAST`: `1`/`true` to skip card animations

use crate::sequencer::Timings;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const SEED_VAR: &str = "RED_OR_BLACK_SEED";
pub const LOG_VAR: &str = "RED_OR_BLACK_LOG";
pub const FAST_VAR: &str = "RED_OR_BLACK_FAST";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got '{value}'")]
    InvalidSeed { var: &'static str, value: String },
    #[error("{var} must be one of 1/0/true/false, got '{value}'")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub timings: Timings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let seed = match get(SEED_VAR) {
            Some(v) => Some(
                v.parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed { var: SEED_VAR, value: v.clone() })?,
            ),
            None => None,
        };
        let fast = match get(FAST_VAR) {
            Some(v) => parse_flag(FAST_VAR, &v)?,
            None => false,
        };
        let timings = if fast { fast_timings() } else { Timings::default() };

        Ok(Self { seed, log_file: get(LOG_VAR).map(PathBuf::from), timings })
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value: value.to_string() }),
    }
}

// Cards resolve at once, but notices stay up long enough to read.
fn fast_timings() -> Timings {
    Timings { notice: Duration::from_millis(1500), ..Timings::instant() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = cfg(&[]).unwrap();
        assert_eq!(c, AppConfig::default());
        assert_eq!(c.timings, Timings::default());
    }

    #[test]
    fn reads_seed_log_and_fast() {
        let c = cfg(&[(SEED_VAR, " 42 "), (LOG_VAR, "/tmp/rob.log"), (FAST_VAR, "true")]).unwrap();
        assert_eq!(c.seed, Some(42));
        assert_eq!(c.log_file, Some(PathBuf::from("/tmp/rob.log")));
        assert_eq!(c.timings.reveal, Duration::ZERO);
        assert!(c.timings.notice > Duration::ZERO);
    }

    #[test]
    fn blank_values_are_unset() {
        let c = cfg(&[(SEED_VAR, "  "), (LOG_VAR, "")]).unwrap();
        assert_eq!(c.seed, None);
        assert_eq!(c.log_file, None);
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(
            cfg(&[(SEED_VAR, "abc")]).unwrap_err(),
            ConfigError::InvalidSeed { var: SEED_VAR, value: "abc".into() }
        );
        assert!(matches!(cfg(&[(FAST_VAR, "maybe")]), Err(ConfigError::InvalidFlag { .. })));
    }
}
