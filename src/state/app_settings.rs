use log::LevelFilter;
use std::time::Duration;
use unitpick_api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const BASE_URL_VAR: &str = "UNITPICK_BASE_URL";
pub const TIMEOUT_VAR: &str = "UNITPICK_TIMEOUT_SECS";
pub const LOG_VAR: &str = "UNITPICK_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub log_level: LevelFilter,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Blank or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            base_url: value(BASE_URL_VAR).unwrap_or(defaults.base_url),
            timeout: value(TIMEOUT_VAR)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            log_level: value(LOG_VAR)
                .and_then(|v| v.parse::<LevelFilter>().ok())
                .unwrap_or(defaults.log_level),
        }
    }
}
