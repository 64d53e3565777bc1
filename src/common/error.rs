//! Error handling module
//!
//! This module defines the error types and result type aliases used in the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Certificate fetcher error type
#[derive(Error, Debug)]
pub enum FetchError {
    /// Missing or malformed host/port argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Host name could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// TCP connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// TLS handshake failed, including untrusted certificate chains
    #[error("TLS handshake error: {0}")]
    Handshake(String),

    /// Handshake completed but the peer presented no certificate
    #[error("No certificate: {0}")]
    NoCertificate(String),

    /// Unknown method name on the method-call boundary
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// OpenSSL error
    #[error("OpenSSL error: {0}")]
    Ssl(#[from] openssl::error::ErrorStack),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Caller-visible error kind
///
/// Serialized by name so the method-call boundary can report it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgument,
    ResolutionError,
    ConnectionError,
    HandshakeError,
    NoCertificateError,
    UnsupportedOperation,
    /// Anything that is not the caller's or the peer's fault
    Internal,
}

impl ErrorKind {
    /// Stable name of the kind, used for log and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::ResolutionError => "ResolutionError",
            Self::ConnectionError => "ConnectionError",
            Self::HandshakeError => "HandshakeError",
            Self::NoCertificateError => "NoCertificateError",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchError {
    /// Map this error onto its caller-visible kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Resolution(_) => ErrorKind::ResolutionError,
            Self::Connection(_) => ErrorKind::ConnectionError,
            Self::Handshake(_) => ErrorKind::HandshakeError,
            Self::NoCertificate(_) => ErrorKind::NoCertificateError,
            Self::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Self::Config(_) | Self::Io(_) | Self::Ssl(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `FetchError`.
pub type Result<T> = std::result::Result<T, FetchError>;
