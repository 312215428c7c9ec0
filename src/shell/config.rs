// Runtime configuration read from the environment.
//
// Variables
// - TIME_TRACKING_GROUPING: `single` or `by_date_and_task`.
// - TIME_TRACKING_UTC_OFFSET_MINUTES: signed offset used to derive calendar dates.
// - TIME_TRACKING_STRICT_DIFF: `true` or `false`; panic on inconsistent rows instead of reloading.
// - TIME_TRACKING_SCHEMA_VERSION: storage version currently on disk; 0 is the legacy format.

use crate::application::store::StoreConfig;
use crate::modules::time_entries::core::state::Settings;
use crate::modules::time_entries::projection::grouping::GroupMethod;
use chrono::FixedOffset;
use thiserror::Error;

pub const GROUPING: &str = "TIME_TRACKING_GROUPING";
pub const UTC_OFFSET_MINUTES: &str = "TIME_TRACKING_UTC_OFFSET_MINUTES";
pub const STRICT_DIFF: &str = "TIME_TRACKING_STRICT_DIFF";
pub const SCHEMA_VERSION_ON_DISK: &str = "TIME_TRACKING_SCHEMA_VERSION";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub group_method: GroupMethod,
    pub utc_offset: FixedOffset,
    pub strict_diff: bool,
    pub schema_version: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            group_method: settings.group_method,
            utc_offset: settings.utc_offset,
            strict_diff: StoreConfig::default().strict_diff,
            schema_version: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(GROUPING) {
            config.group_method = match value.trim().to_ascii_lowercase().as_str() {
                "single" => GroupMethod::Single,
                "by_date_and_task" => GroupMethod::ByDateAndTask,
                _ => return Err(invalid(GROUPING, value, "expected single or by_date_and_task")),
            };
        }
        if let Some(value) = lookup(UTC_OFFSET_MINUTES) {
            config.utc_offset = value
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|minutes| minutes.abs() < 24 * 60)
                .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
                .ok_or_else(|| invalid(UTC_OFFSET_MINUTES, value.clone(), "expected minutes within a day"))?;
        }
        if let Some(value) = lookup(STRICT_DIFF) {
            config.strict_diff = value
                .trim()
                .parse()
                .map_err(|_| invalid(STRICT_DIFF, value.clone(), "expected true or false"))?;
        }
        if let Some(value) = lookup(SCHEMA_VERSION_ON_DISK) {
            config.schema_version = value
                .trim()
                .parse()
                .map_err(|_| invalid(SCHEMA_VERSION_ON_DISK, value.clone(), "expected a version number"))?;
        }
        Ok(config)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            group_method: self.group_method,
            utc_offset: self.utc_offset,
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            strict_diff: self.strict_diff,
        }
    }
}

fn invalid(name: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value,
        reason,
    }
}
