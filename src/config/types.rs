//! Configuration types
//!
//! This module contains the configuration types used throughout the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::defaults;
use super::error::ConfigError;

/// Letter case used when hex-encoding certificate bytes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    /// `0a1b2c...`
    #[default]
    Lower,
    /// `0A1B2C...`
    Upper,
}

impl fmt::Display for HexCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexCase::Lower => write!(f, "lower"),
            HexCase::Upper => write!(f, "upper"),
        }
    }
}

impl FromStr for HexCase {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            _ => Err(ConfigError::InvalidValue(
                "hex_case".to_string(),
                format!("Invalid hex case: {}. Valid values are: lower, upper", s),
            )),
        }
    }
}

/// Fetcher configuration
///
/// Loaded from defaults, an optional JSON file, `CERT_FETCHER_*` environment
/// variables and command line flags, in increasing order of priority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FetcherConfig {
    /// Deadline for resolve + connect + handshake, in seconds
    pub timeout_secs: u64,

    /// Case of the hex output
    pub hex_case: HexCase,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Capacity of the method-call queue in front of the worker
    pub queue_capacity: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout_secs(),
            hex_case: defaults::hex_case(),
            log_level: defaults::log_level(),
            queue_capacity: defaults::queue_capacity(),
        }
    }
}

impl FetcherConfig {
    /// Deadline for a single fetch
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
