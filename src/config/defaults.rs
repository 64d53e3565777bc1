//! Default configuration values
//!
//! Single source of truth for configuration defaults.

use super::types::HexCase;

/// Environment variable prefix for all configuration options
///
/// Variables are named `CERT_FETCHER_<FIELD>`, e.g. `CERT_FETCHER_TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "CERT_FETCHER";

/// Default configuration file name, picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "cert-fetcher.json";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Default deadline for resolve + connect + handshake, in seconds
pub fn timeout_secs() -> u64 {
    10
}

/// Largest accepted deadline, in seconds
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default hex case
pub fn hex_case() -> HexCase {
    HexCase::Lower
}

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Default capacity of the method-call queue
pub fn queue_capacity() -> usize {
    100
}
