//! JSON-lines bridge
//!
//! Reads one method call per line and writes one response per line. Calls run
//! concurrently, so responses can come back out of order; callers match them
//! by `id`.

use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};

use super::method::{MethodCall, MethodResponse};
use super::service::ChannelHandle;
use crate::common::{FetchError, Result};

/// Serve newline-delimited JSON method calls
///
/// # Parameters
///
/// * `input` - Source of call lines; blank lines are skipped
/// * `output` - Sink for response lines
/// * `handle` - Channel the calls are submitted to
/// * `max_in_flight` - Number of calls that may run at once; no further line
///   is read while the limit is reached
/// * `shutdown` - Resolves when in-flight calls should be cancelled
///
/// # Returns
///
/// The output sink once every response has been written. At end of input
/// in-flight calls complete first; on `shutdown` they are dropped unanswered.
pub async fn serve_json_lines<R, W, F>(
    input: R,
    output: W,
    handle: &ChannelHandle,
    max_in_flight: usize,
    shutdown: F,
) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    F: Future<Output = ()>,
{
    // Single writer keeps response lines whole
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut output = output;
        while let Some(line) = out_rx.recv().await {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok::<W, std::io::Error>(output)
    });

    let slots = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut lines = input.lines();
    let mut pending = JoinSet::new();
    tokio::pin!(shutdown);

    let mut interrupted = false;
    loop {
        let permit = tokio::select! {
            permit = Arc::clone(&slots).acquire_owned() => {
                permit.map_err(|_| FetchError::Other("In-flight limiter closed".to_string()))?
            }
            Some(joined) = pending.join_next(), if !pending.is_empty() => {
                log_join(joined);
                continue;
            }
            _ = &mut shutdown => {
                interrupted = true;
                break;
            }
        };

        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    let handle = handle.clone();
                    let out_tx = out_tx.clone();
                    pending.spawn(async move {
                        let _permit = permit;
                        let response = respond(&handle, &line).await;
                        match serde_json::to_string(&response) {
                            Ok(json) => {
                                let _ = out_tx.send(json);
                            }
                            Err(e) => error!("Failed to encode response: {}", e),
                        }
                    });
                }
                None => break,
            },
            Some(joined) = pending.join_next(), if !pending.is_empty() => log_join(joined),
            _ = &mut shutdown => {
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        info!("Shutdown requested, cancelling {} in-flight calls", pending.len());
        pending.shutdown().await;
    } else {
        debug!("End of input, waiting for {} in-flight calls", pending.len());
        while let Some(joined) = pending.join_next().await {
            log_join(joined);
        }
    }

    drop(out_tx);
    writer
        .await
        .map_err(|e| FetchError::Other(format!("Output writer failed: {}", e)))?
        .map_err(FetchError::from)
}

async fn respond(handle: &ChannelHandle, line: &str) -> MethodResponse {
    match MethodCall::from_json(line) {
        Ok(call) => {
            let id = call.id.clone();
            handle
                .invoke(call)
                .await
                .unwrap_or_else(|e| MethodResponse::from_error(id, e))
        }
        Err(e) => {
            warn!("{}", e);
            MethodResponse::from_error(None, e)
        }
    }
}

fn log_join(joined: std::result::Result<(), JoinError>) {
    if let Err(e) = joined {
        error!("Call task failed: {}", e);
    }
}
