//! Engine configuration loaded from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! in-memory configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `DNAFORGE_INVENTORY_SLOTS` | 30 |
//! | `DNAFORGE_BACKPACK_CAPACITY` | 9 |
//! | `DNAFORGE_LONG_PRESS_MS` | 500 |
//! | `DNAFORGE_DRAG_THRESHOLD_PX` | 8 |
//! | `DNAFORGE_CATALOG_PATH` | built-in starter catalog |
//! | `DNAFORGE_PERSISTENCE_URL` | in-memory store |
//! | `DNAFORGE_FLUSH_TIMEOUT_SECS` | 10 |
//! | `DNAFORGE_SCRIPT` | none |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dnaforge_domain::{GestureConfig, DEFAULT_DRAG_THRESHOLD_PX, DEFAULT_LONG_PRESS};

pub const DEFAULT_INVENTORY_SLOTS: usize = 30;
pub const DEFAULT_BACKPACK_CAPACITY: usize = 9;
pub const DEFAULT_FLUSH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub inventory_slots: usize,
    pub backpack_capacity: usize,
    pub gesture: GestureConfig,
    pub catalog_path: Option<PathBuf>,
    pub persistence_url: Option<String>,
    pub flush_timeout: Duration,
    pub script_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inventory_slots: DEFAULT_INVENTORY_SLOTS,
            backpack_capacity: DEFAULT_BACKPACK_CAPACITY,
            gesture: GestureConfig::default(),
            catalog_path: None,
            persistence_url: None,
            flush_timeout: Duration::from_secs(DEFAULT_FLUSH_TIMEOUT_SECS),
            script_path: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let inventory_slots = parse_or(
            "DNAFORGE_INVENTORY_SLOTS",
            var("DNAFORGE_INVENTORY_SLOTS"),
            DEFAULT_INVENTORY_SLOTS,
        )?;
        if inventory_slots == 0 {
            return Err(invalid(
                "DNAFORGE_INVENTORY_SLOTS",
                "0",
                "inventory needs at least one slot",
            ));
        }

        let backpack_capacity = parse_or(
            "DNAFORGE_BACKPACK_CAPACITY",
            var("DNAFORGE_BACKPACK_CAPACITY"),
            DEFAULT_BACKPACK_CAPACITY,
        )?;

        let long_press_ms = parse_or(
            "DNAFORGE_LONG_PRESS_MS",
            var("DNAFORGE_LONG_PRESS_MS"),
            DEFAULT_LONG_PRESS.as_millis() as u64,
        )?;

        let drag_threshold_px = parse_or(
            "DNAFORGE_DRAG_THRESHOLD_PX",
            var("DNAFORGE_DRAG_THRESHOLD_PX"),
            DEFAULT_DRAG_THRESHOLD_PX,
        )?;
        if !drag_threshold_px.is_finite() || drag_threshold_px < 0.0 {
            return Err(invalid(
                "DNAFORGE_DRAG_THRESHOLD_PX",
                drag_threshold_px.to_string(),
                "must be a non-negative number",
            ));
        }

        let flush_timeout_secs = parse_or(
            "DNAFORGE_FLUSH_TIMEOUT_SECS",
            var("DNAFORGE_FLUSH_TIMEOUT_SECS"),
            DEFAULT_FLUSH_TIMEOUT_SECS,
        )?;

        Ok(Self {
            inventory_slots,
            backpack_capacity,
            gesture: GestureConfig {
                long_press: Duration::from_millis(long_press_ms),
                drag_threshold_px,
            },
            catalog_path: var("DNAFORGE_CATALOG_PATH").map(PathBuf::from),
            persistence_url: var("DNAFORGE_PERSISTENCE_URL"),
            flush_timeout: Duration::from_secs(flush_timeout_secs),
            script_path: var("DNAFORGE_SCRIPT").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| invalid(key, raw.as_str(), e.to_string())),
    }
}

fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.into(),
        reason: reason.into(),
    }
}
