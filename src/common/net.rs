//! Network utility functions
//!
//! This module provides the connection target type and host resolution.

use log::debug;
use std::fmt;
use std::net::SocketAddr;

use super::error::{FetchError, Result};

/// Host and port of a TLS endpoint
///
/// Only constructed through the validating constructors, so a value of this
/// type always has a non-empty host and a port in `1..=65535`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionTarget {
    host: String,
    port: u16,
}

impl ConnectionTarget {
    /// Create a new connection target
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidArgument` if the host is empty or the port is 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(FetchError::InvalidArgument("host must not be empty".to_string()));
        }
        if port == 0 {
            return Err(FetchError::InvalidArgument("port must be in 1..=65535".to_string()));
        }

        Ok(Self {
            host: trimmed.to_string(),
            port,
        })
    }

    /// Create a connection target from an unchecked integer port
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidArgument` if the port is outside `1..=65535`.
    pub fn from_parts(host: impl Into<String>, port: i64) -> Result<Self> {
        let port = u16::try_from(port).map_err(|_| {
            FetchError::InvalidArgument(format!("port {} is outside 1..=65535", port))
        })?;
        Self::new(host, port)
    }

    /// Host name or literal IP address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Host with IPv6 literals unbracketed, as used for SNI and hostname checks
    pub fn server_name(&self) -> &str {
        self.host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(&self.host)
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_name().contains(':') {
            write!(f, "[{}]:{}", self.server_name(), self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Resolve a connection target to socket addresses
///
/// Literal IP addresses resolve without a DNS lookup.
///
/// # Errors
///
/// Returns `FetchError::Resolution` if the lookup fails or yields no address.
pub async fn resolve_target(target: &ConnectionTarget) -> Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((target.server_name(), target.port()))
        .await
        .map_err(|e| FetchError::Resolution(format!("Failed to resolve {}: {}", target.host(), e)))?
        .collect();

    if addrs.is_empty() {
        return Err(FetchError::Resolution(format!(
            "No addresses found for {}",
            target.host()
        )));
    }

    debug!("Resolved {} to {:?}", target, addrs);
    Ok(addrs)
}
