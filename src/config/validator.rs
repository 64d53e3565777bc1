//! Configuration validator
//!
//! This module provides functionality for validating configuration.

use crate::config::defaults::MAX_TIMEOUT_SECS;
use crate::config::error::{ConfigError, Result};
use crate::config::types::FetcherConfig;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Validate the configuration
pub fn validate_config(config: &FetcherConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue(
            "timeout_secs".to_string(),
            "Timeout must be greater than 0".to_string(),
        ));
    }

    if config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidValue(
            "timeout_secs".to_string(),
            format!("Timeout must be at most {} seconds", MAX_TIMEOUT_SECS),
        ));
    }

    if config.queue_capacity == 0 {
        return Err(ConfigError::InvalidValue(
            "queue_capacity".to_string(),
            "Queue capacity must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Configuration validator trait
pub trait ConfigValidator {
    /// Validate configuration, failing on unusable values
    fn validate(&self) -> Result<()>;

    /// Check configuration for warnings
    fn check_warnings(&self) -> Vec<String>;
}

impl ConfigValidator for FetcherConfig {
    fn validate(&self) -> Result<()> {
        validate_config(self)
    }

    fn check_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            warnings.push(format!("Invalid log level '{}', using default 'info'", self.log_level));
        }

        if self.timeout_secs > 120 {
            warnings.push(format!(
                "Timeout of {}s is unusually long for a single handshake",
                self.timeout_secs
            ));
        }

        warnings
    }
}
