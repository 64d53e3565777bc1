//! Configuration module
//!
//! This module handles application configuration, including loading from
//! different sources (files, environment variables, command line arguments)
//! and validating the configuration.

mod defaults;
mod error;
mod loader;
mod types;
mod validator;

pub use self::defaults::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use self::error::ConfigError;
pub use self::loader::ConfigLoader;
pub use self::types::{FetcherConfig, HexCase};
pub use self::validator::{validate_config, ConfigValidator};
