//! Certificate record
//!
//! Holds the DER bytes of a peer's leaf certificate and renders them.

use openssl::hash::MessageDigest;
use openssl::x509::{X509, X509Ref};
use std::fmt::Write;

use crate::common::{FetchError, Result};
use crate::config::HexCase;

/// DER encoding of a server's leaf certificate
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    der: Vec<u8>,
}

impl CertificateRecord {
    /// Wrap DER bytes
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NoCertificate` if `der` is empty.
    pub fn new(der: Vec<u8>) -> Result<Self> {
        if der.is_empty() {
            return Err(FetchError::NoCertificate(
                "Peer certificate has an empty encoding".to_string(),
            ));
        }
        Ok(Self { der })
    }

    /// Encode an OpenSSL certificate
    pub fn from_x509(cert: &X509Ref) -> Result<Self> {
        Self::new(cert.to_der()?)
    }

    /// Raw DER bytes
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// DER length in bytes
    pub fn len(&self) -> usize {
        self.der.len()
    }

    /// Whether the DER encoding is empty
    pub fn is_empty(&self) -> bool {
        self.der.is_empty()
    }

    /// Hex encoding of the DER bytes, two characters per byte, no separators
    pub fn to_hex(&self, case: HexCase) -> String {
        encode_hex(&self.der, case)
    }

    /// Subject name as `CN=..., O=...`
    pub fn subject(&self) -> Result<String> {
        let cert = X509::from_der(&self.der)?;

        let mut subject = String::new();
        for entry in cert.subject_name().entries() {
            if !subject.is_empty() {
                subject.push_str(", ");
            }
            let _ = write!(
                subject,
                "{}={}",
                entry.object().nid().short_name()?,
                entry.data().as_utf8()?
            );
        }

        Ok(subject)
    }

    /// SHA-256 fingerprint as colon-separated uppercase hex
    pub fn sha256_fingerprint(&self) -> Result<String> {
        let cert = X509::from_der(&self.der)?;
        let digest = cert.digest(MessageDigest::sha256())?;

        Ok(digest
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<String>>()
            .join(":"))
    }
}

/// Hex-encode bytes in the requested case
pub fn encode_hex(bytes: &[u8], case: HexCase) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = match case {
            HexCase::Lower => write!(out, "{:02x}", b),
            HexCase::Upper => write!(out, "{:02X}", b),
        };
    }
    out
}
