//! Configuration loading functionality
//!
//! Layers defaults, an optional JSON file and `CERT_FETCHER_*` environment
//! variables using the `config` crate.

use log::{debug, info};
use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};

use crate::config::defaults::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::config::error::{ConfigError, Result};
use crate::config::types::FetcherConfig;

/// Trait for loading configuration from different sources
pub trait ConfigLoader {
    /// Load configuration from a JSON file on top of the defaults
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> where Self: Sized;

    /// Load configuration from environment variables on top of the defaults
    fn from_env() -> Result<Self> where Self: Sized;

    /// Load configuration with priority defaults < file < environment
    ///
    /// Without an explicit `path`, `cert-fetcher.json` in the working
    /// directory is used when it exists.
    fn load(path: Option<&Path>) -> Result<Self> where Self: Sized;
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn file_source(path: &Path) -> Result<File<::config::FileSourceFile, FileFormat>> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    Ok(File::from(path).format(FileFormat::Json).required(true))
}

impl ConfigLoader for FetcherConfig {
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from file: {}", path.display());

        let settings = Config::builder()
            .add_source(file_source(path)?)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment with prefix {}", ENV_PREFIX);

        let settings = Config::builder().add_source(env_source()).build()?;
        Ok(settings.try_deserialize()?)
    }

    fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                builder = builder.add_source(file_source(path)?);
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
                builder = builder.add_source(file_source(Path::new(DEFAULT_CONFIG_FILE))?);
            }
            None => debug!("No configuration file, using defaults"),
        }

        let settings = builder.add_source(env_source()).build()?;
        Ok(settings.try_deserialize()?)
    }
}
