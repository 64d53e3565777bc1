//! cert-fetcher: fetch the leaf TLS certificate of a server
//!
//! Opens a TLS connection to a host and port, completes the handshake against
//! the default trust store and returns the DER encoding of the server's leaf
//! certificate as a hex string.
//!
//! # Main Features
//!
//! - Async fetch with an explicit deadline covering resolve, connect and handshake
//! - Typed errors for resolution, connection, handshake and empty-chain failures
//! - A method-call boundary (`getServerCertificate`) with total argument checks
//! - A worker channel that runs calls off the caller's execution context
//!
//! # Example
//!
//! ```no_run
//! use cert_fetcher::{CertificateFetcher, Result};
//! use cert_fetcher::config::FetcherConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = CertificateFetcher::new(&FetcherConfig::default())?;
//!     let hex = fetcher.fetch_server_certificate("example.com", 443).await?;
//!     println!("{}", hex);
//!     Ok(())
//! }
//! ```

// Public modules
pub mod channel;
pub mod common;
pub mod config;
pub mod tls;

// Re-export commonly used structures and functions for convenience
pub use channel::{spawn_channel, ChannelHandle, MethodCall, MethodCallHandler, MethodResult};
pub use common::{ConnectionTarget, ErrorKind, FetchError, Result};
pub use tls::{fetch_server_certificate, CertificateFetcher, CertificateRecord};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
