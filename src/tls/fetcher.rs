//! Server certificate fetcher
//!
//! Resolves a target, connects, runs a TLS client handshake against the
//! default trust store and returns the peer's leaf certificate.

use log::{debug, info, warn};
use openssl::ssl::{SslConnector, SslRef};
use openssl::x509::X509VerifyResult;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tokio_openssl::SslStream;

use super::cert::CertificateRecord;
use super::connector::create_tls_connector;
use crate::common::{resolve_target, ConnectionTarget, FetchError, Result};
use crate::config::{FetcherConfig, HexCase};

/// Fetches leaf certificates from TLS servers
///
/// Each fetch owns its own socket and TLS session; nothing is shared between
/// calls except the immutable connector, so a fetcher can be cloned and used
/// from many tasks at once.
#[derive(Clone)]
pub struct CertificateFetcher {
    /// TLS client configuration
    connector: SslConnector,
    /// Deadline for resolve + connect + handshake
    timeout: Duration,
    /// Case of the hex output
    hex_case: HexCase,
}

impl std::fmt::Debug for CertificateFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateFetcher")
            .field("connector", &"<SslConnector>")
            .field("timeout", &self.timeout)
            .field("hex_case", &self.hex_case)
            .finish()
    }
}

impl CertificateFetcher {
    /// Create a fetcher that trusts OpenSSL's default verify paths
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cert_fetcher::CertificateFetcher;
    /// # use cert_fetcher::config::FetcherConfig;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = CertificateFetcher::new(&FetcherConfig::default())?;
    /// let hex = fetcher.fetch_server_certificate("example.com", 443).await?;
    /// println!("{}", hex);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::with_connector(create_tls_connector()?, config))
    }

    /// Create a fetcher around a prebuilt connector
    pub fn with_connector(connector: SslConnector, config: &FetcherConfig) -> Self {
        Self {
            connector,
            timeout: config.timeout(),
            hex_case: config.hex_case,
        }
    }

    /// Override the fetch deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Deadline applied to each fetch
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Case of the hex output
    pub fn hex_case(&self) -> HexCase {
        self.hex_case
    }

    /// Fetch the leaf certificate of `host:port` as a hex-encoded DER string
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` - empty host, port 0, or a timeout too large to schedule
    /// * `Resolution` - the host could not be resolved
    /// * `Connection` - no resolved address accepted a TCP connection
    /// * `Handshake` - the TLS handshake failed, including untrusted chains
    /// * `NoCertificate` - the peer presented no certificate
    pub async fn fetch_server_certificate(&self, host: &str, port: u16) -> Result<String> {
        let target = ConnectionTarget::new(host, port)?;
        let record = self.fetch_certificate(&target).await?;
        Ok(record.to_hex(self.hex_case))
    }

    /// Fetch the leaf certificate of a target
    pub async fn fetch_certificate(&self, target: &ConnectionTarget) -> Result<CertificateRecord> {
        let started = Instant::now();
        let result = match started.checked_add(self.timeout) {
            Some(deadline) => self.fetch_before(target, deadline).await,
            None => Err(FetchError::InvalidArgument(format!(
                "Timeout of {:?} is out of range",
                self.timeout
            ))),
        };
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(record) => {
                info!("Fetched {}-byte certificate from {} in {:?}", record.len(), target, elapsed);
                "success"
            }
            Err(e) => {
                warn!("Failed to fetch certificate from {}: {}", target, e);
                e.kind().as_str()
            }
        };
        metrics::counter!("cert_fetch_total", "outcome" => outcome).increment(1);
        metrics::histogram!("cert_fetch_duration_seconds").record(elapsed.as_secs_f64());

        result
    }

    async fn fetch_before(&self, target: &ConnectionTarget, deadline: Instant) -> Result<CertificateRecord> {
        let addrs = timeout_at(deadline, resolve_target(target))
            .await
            .map_err(|_| FetchError::Resolution(format!("Timed out resolving {}", target.host())))??;

        let tcp = connect_any(target, &addrs, deadline).await?;

        // SNI plus hostname (or IP) verification against the requested host
        let ssl = self.connector.configure()?.into_ssl(target.server_name())?;
        let mut stream = SslStream::new(ssl, tcp)?;

        let handshake = timeout_at(deadline, Pin::new(&mut stream).connect()).await;
        match handshake {
            Err(_) => {
                return Err(FetchError::Handshake(format!("Timed out during handshake with {}", target)));
            }
            Ok(Err(e)) => {
                let verify = stream.ssl().verify_result();
                let message = if verify == X509VerifyResult::OK {
                    e.to_string()
                } else {
                    format!("{} (certificate verification: {})", e, verify.error_string())
                };
                return Err(FetchError::Handshake(message));
            }
            Ok(Ok(())) => {}
        }

        debug!(
            "TLS handshake with {} complete ({})",
            target,
            stream.ssl().version_str()
        );

        // The stream, and with it the socket, is dropped here on success and on every early return
        leaf_certificate(stream.ssl(), target)
    }
}

/// Leaf certificate of a session, falling back to the head of the presented chain
fn leaf_certificate(ssl: &SslRef, target: &ConnectionTarget) -> Result<CertificateRecord> {
    let leaf = ssl.peer_certificate().or_else(|| {
        ssl.peer_cert_chain()
            .and_then(|chain| chain.iter().next())
            .map(|cert| cert.to_owned())
    });

    let leaf = leaf.ok_or_else(|| {
        FetchError::NoCertificate(format!("{} completed the handshake without a certificate", target))
    })?;

    CertificateRecord::from_x509(&leaf)
}

/// Connect to the first resolved address that accepts
async fn connect_any(target: &ConnectionTarget, addrs: &[SocketAddr], deadline: Instant) -> Result<TcpStream> {
    let mut last_error = None;

    for addr in addrs {
        match timeout_at(deadline, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                debug!("Connected to {} via {}", target, addr);
                return Ok(stream);
            }
            Ok(Err(e)) => {
                debug!("Connection to {} failed: {}", addr, e);
                last_error = Some(e);
            }
            Err(_) => {
                return Err(FetchError::Connection(format!("Timed out connecting to {}", target)));
            }
        }
    }

    Err(FetchError::Connection(match last_error {
        Some(e) => format!("Failed to connect to {}: {}", target, e),
        None => format!("Failed to connect to {}", target),
    }))
}

/// Fetch the leaf certificate of `host:port` with the default configuration
///
/// Lowercase hex, 10 second deadline, default trust store.
pub async fn fetch_server_certificate(host: &str, port: u16) -> Result<String> {
    CertificateFetcher::new(&FetcherConfig::default())?
        .fetch_server_certificate(host, port)
        .await
}
