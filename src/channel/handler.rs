//! Method-call handler
//!
//! Turns a `MethodCall` into a `MethodResult`. Never panics and never lets an
//! error escape: every failure becomes an error response.

use async_trait::async_trait;
use log::{debug, warn};

use super::method::{Method, MethodCall, MethodResponse, MethodResult};
use crate::common::{ConnectionTarget, Result};
use crate::tls::CertificateFetcher;

/// Source of hex-encoded server certificates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateSource: Send + Sync {
    /// Fetch the leaf certificate of `target` as a hex string
    async fn fetch(&self, target: &ConnectionTarget) -> Result<String>;
}

#[async_trait]
impl CertificateSource for CertificateFetcher {
    async fn fetch(&self, target: &ConnectionTarget) -> Result<String> {
        let record = self.fetch_certificate(target).await?;
        Ok(record.to_hex(self.hex_case()))
    }
}

/// Dispatches method calls to a certificate source
pub struct MethodCallHandler<S> {
    source: S,
}

impl<S: CertificateSource> MethodCallHandler<S> {
    /// Create a handler over `source`
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Handle a single call
    pub async fn handle(&self, call: &MethodCall) -> MethodResult {
        let method = match Method::try_from(call) {
            Ok(method) => method,
            Err(e) => {
                warn!("Rejected call to {}: {}", call.method, e);
                return MethodResult::from_error(e);
            }
        };

        match method {
            Method::GetServerCertificate(target) => {
                debug!("Handling {} for {}", call.method, target);
                match self.source.fetch(&target).await {
                    Ok(hex) => MethodResult::Success { result: hex },
                    Err(e) => MethodResult::from_error(e),
                }
            }
        }
    }

    /// Handle a call and pair the result with its id
    pub async fn respond(&self, call: &MethodCall) -> MethodResponse {
        MethodResponse {
            id: call.id.clone(),
            result: self.handle(call).await,
        }
    }

    /// Handle one JSON-encoded call
    ///
    /// Input that is not a valid call object is answered with an
    /// `InvalidArgument` error.
    pub async fn respond_json(&self, line: &str) -> MethodResponse {
        match MethodCall::from_json(line) {
            Ok(call) => self.respond(&call).await,
            Err(e) => {
                warn!("{}", e);
                MethodResponse::from_error(None, e)
            }
        }
    }
}
