//! TLS connector creation using the default trust store

use log::debug;
use openssl::ssl::{SslConnector, SslMethod};

use crate::common::Result;

/// Create a TLS client connector with OpenSSL's default configuration
///
/// Peer verification is on and trust anchors come from OpenSSL's default
/// verify paths (the platform CA bundle, or `SSL_CERT_FILE`/`SSL_CERT_DIR`).
///
/// # Example
///
/// ```no_run
/// # use cert_fetcher::tls::create_tls_connector;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let connector = create_tls_connector()?;
/// # Ok(())
/// # }
/// ```
pub fn create_tls_connector() -> Result<SslConnector> {
    debug!("Creating TLS connector ({})", openssl::version::version());

    // `SslConnector::builder` loads the default verify paths and enables peer verification
    let builder = SslConnector::builder(SslMethod::tls())?;

    Ok(builder.build())
}
