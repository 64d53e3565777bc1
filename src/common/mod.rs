//! Common module
//!
//! This module contains shared types, errors, and utility functions used throughout the application.

pub mod error;
pub mod log;
pub mod net;

// Re-export commonly used types and functions
pub use error::{ErrorKind, FetchError, Result};
pub use self::log::init_logger;
pub use net::{resolve_target, ConnectionTarget};
