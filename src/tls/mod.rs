//! TLS handling module
//!
//! This module opens TLS client connections and extracts server certificates.

mod cert;
mod connector;
mod fetcher;

pub use cert::{encode_hex, CertificateRecord};
pub use connector::create_tls_connector;
pub use fetcher::{fetch_server_certificate, CertificateFetcher};
