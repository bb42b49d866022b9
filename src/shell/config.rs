// Runtime settings read from the environment.
//
// Every variable is optional; a value that is present but does not parse is an error rather
// than a silent fallback to the default.

use chrono::{FixedOffset, Offset, Utc};
use std::time::Duration;
use thiserror::Error;

pub const TICK_INTERVAL_MS: &str = "TIME_CARDS_TICK_INTERVAL_MS";
pub const UTC_OFFSET_MINUTES: &str = "TIME_CARDS_UTC_OFFSET_MINUTES";
pub const HISTORY_LIMIT: &str = "TIME_CARDS_HISTORY_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tick_interval: Duration,
    pub utc_offset: FixedOffset,
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            utc_offset: Utc.fix(),
            history_limit: 7,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let tick_interval = match parse::<u64>(&lookup, TICK_INTERVAL_MS)? {
            Some(0) => return Err(invalid(TICK_INTERVAL_MS, "0")),
            Some(millis) => Duration::from_millis(millis),
            None => defaults.tick_interval,
        };

        let utc_offset = match parse::<i32>(&lookup, UTC_OFFSET_MINUTES)? {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| invalid(UTC_OFFSET_MINUTES, &minutes.to_string()))?,
            None => defaults.utc_offset,
        };

        let history_limit = parse::<usize>(&lookup, HISTORY_LIMIT)?.unwrap_or(defaults.history_limit);

        Ok(Self {
            tick_interval,
            utc_offset,
            history_limit,
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| invalid(key, &raw))
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}
