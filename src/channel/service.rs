//! Channel service
//!
//! Runs method calls on a worker task so callers never block on network I/O.
//! Callers hold a cheap `ChannelHandle`; each call travels over a bounded
//! queue and its result comes back on a oneshot channel.

use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};

use super::handler::{CertificateSource, MethodCallHandler};
use super::method::{MethodCall, MethodResponse};
use crate::common::{FetchError, Result};

/// Messages that can be sent to the worker
pub enum ChannelMessage {
    /// Run a method call
    Invoke {
        /// The call
        call: MethodCall,
        /// Where to deliver the response
        reply: oneshot::Sender<MethodResponse>,
    },
    /// Stop accepting calls; in-flight calls still complete
    Shutdown,
}

impl std::fmt::Debug for ChannelMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoke { call, .. } => f
                .debug_struct("Invoke")
                .field("call", call)
                .field("reply", &"<oneshot::Sender>")
                .finish(),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Handle for submitting calls to the worker
///
/// Cloning is cheap. The worker stops once every handle is dropped or
/// `shutdown` is called.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    sender: mpsc::Sender<ChannelMessage>,
}

impl ChannelHandle {
    /// Submit a call and wait for its response
    ///
    /// Dropping the returned future cancels the call: the worker notices the
    /// closed reply channel and drops the in-flight fetch, closing its socket.
    pub async fn invoke(&self, call: MethodCall) -> Result<MethodResponse> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(ChannelMessage::Invoke { call, reply })
            .await
            .map_err(|_| FetchError::Other("Channel service is not running".to_string()))?;

        response
            .await
            .map_err(|_| FetchError::Other("Channel service dropped the call".to_string()))
    }

    /// Ask the worker to stop after finishing in-flight calls
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(ChannelMessage::Shutdown)
            .await
            .map_err(|_| FetchError::Other("Channel service is not running".to_string()))
    }
}

/// Start the worker task
///
/// # Parameters
///
/// * `handler` - Handler that runs each call
/// * `capacity` - Number of calls that may wait in the queue
///
/// # Returns
///
/// The handle for submitting calls and the worker's join handle
pub fn spawn_channel<S>(handler: MethodCallHandler<S>, capacity: usize) -> (ChannelHandle, JoinHandle<()>)
where
    S: CertificateSource + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let worker = tokio::spawn(run(Arc::new(handler), receiver));
    (ChannelHandle { sender }, worker)
}

async fn run<S>(handler: Arc<MethodCallHandler<S>>, mut receiver: mpsc::Receiver<ChannelMessage>)
where
    S: CertificateSource + 'static,
{
    info!("Channel service started");
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            message = receiver.recv() => match message {
                Some(ChannelMessage::Invoke { call, mut reply }) => {
                    let handler = Arc::clone(&handler);
                    tasks.spawn(async move {
                        tokio::select! {
                            _ = reply.closed() => {
                                debug!("Caller dropped {} call, cancelling", call.method);
                            }
                            response = handler.respond(&call) => {
                                let _ = reply.send(response);
                            }
                        }
                    });
                }
                Some(ChannelMessage::Shutdown) => {
                    info!("Channel service shutting down");
                    break;
                }
                None => {
                    debug!("All channel handles dropped");
                    break;
                }
            },
            Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = result {
                    error!("Call task failed: {}", e);
                }
            }
        }
    }

    receiver.close();
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!("Call task failed: {}", e);
        }
    }
    info!("Channel service stopped");
}
