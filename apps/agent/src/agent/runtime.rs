//! Persistent execution context for reasoning-loop invocations.
//!
//! Built once in `main` from the server's runtime handle and kept for the
//! process lifetime. Every run is spawned onto it under a wall-clock bound and
//! a shared cancellation token; `shutdown` cancels in-flight runs and rejects
//! new ones. A run whose caller goes away (client disconnect) is cancelled
//! too, dropping whatever it owns, such as a session lock.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::AgentError;

#[derive(Clone)]
pub struct ExecutionContext {
    handle: Handle,
    shutdown: CancellationToken,
    timeout: Duration,
}

impl ExecutionContext {
    pub fn new(handle: Handle, timeout: Duration) -> Self {
        Self {
            handle,
            shutdown: CancellationToken::new(),
            timeout,
        }
    }

    /// Context on the runtime the caller is running in.
    pub fn current(timeout: Duration) -> Self {
        Self::new(Handle::current(), timeout)
    }

    pub async fn run<F, T>(&self, work: F) -> Result<T, AgentError>
    where
        F: Future<Output = Result<T, AgentError>> + Send + 'static,
        T: Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            return Err(AgentError::Cancelled);
        }
        let cancelled = self.shutdown.child_token();
        // Cancels the spawned run if this future is dropped before it finishes.
        let _abandoned = cancelled.clone().drop_guard();
        let timeout = self.timeout;

        let task = self.handle.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => Err(AgentError::Cancelled),
                outcome = tokio::time::timeout(timeout, work) => match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Reasoning run exceeded {timeout:?}");
                        Err(AgentError::Timeout(timeout))
                    }
                },
            }
        });

        task.await.map_err(|e| AgentError::Join(e.to_string()))?
    }

    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            info!("Shutting down execution context");
            self.shutdown.cancel();
        }
    }
}
