//! Logging utilities
//!
//! Thin wrapper around `env_logger`.

/// Initialize the logger
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// # Parameters
///
/// * `level` - Default log level
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    // A logger may already be installed (tests, embedding applications)
    let _ = env_logger::Builder::from_env(env).try_init();
}
