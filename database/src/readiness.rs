//! Startup readiness gate: block until the database accepts connections.

use crate::connection::ConnectionParams;
use sqlx::Connection;
use std::{future::Future, time::Duration};
use taskboard_core::error::{Result, TaskError};
use tokio::time::Instant;

/// Default time allowed for the database to become reachable
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Default pause between connection attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Default connect timeout for a single probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Polls the database until a connection succeeds or the deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessGate {
    deadline: Duration,
    retry_interval: Duration,
    probe_timeout: Duration,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl ReadinessGate {
    pub fn new(deadline: Duration, retry_interval: Duration, probe_timeout: Duration) -> Self {
        Self {
            deadline,
            retry_interval,
            probe_timeout,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Wait until a probe connection to `params` succeeds.
    ///
    /// The probe connection is closed before returning.
    ///
    /// # Returns
    /// * `Ok(())` - The database accepted a connection
    /// * `Err(TaskError::Startup)` - The deadline elapsed; carries the last connection error
    pub async fn wait(&self, params: &ConnectionParams) -> Result<()> {
        let probe_timeout = self.probe_timeout;
        self.wait_for(|| async move {
            let conn = params.connect_with_timeout(probe_timeout).await?;
            if let Err(e) = conn.close().await {
                tracing::debug!(error = %e, "Failed to close readiness probe connection");
            }
            Ok(())
        })
        .await
    }

    /// Run `probe` until it succeeds or the deadline passes.
    ///
    /// At least one attempt is always made. Between failed attempts the gate
    /// sleeps for the retry interval.
    pub async fn wait_for<F, Fut>(&self, mut probe: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let last_error = match probe().await {
                Ok(()) => {
                    tracing::info!(
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Database is ready"
                    );
                    return Ok(());
                }
                Err(e) => e,
            };

            if started.elapsed() >= self.deadline {
                tracing::error!(attempt, error = %last_error, "Database not ready before deadline");
                return Err(TaskError::Startup(format!(
                    "Database not ready after {}s. Last error: {last_error}",
                    self.deadline.as_secs()
                )));
            }

            tracing::warn!(
                attempt,
                error = %last_error,
                retry_in_ms = self.retry_interval.as_millis() as u64,
                "Database not ready yet"
            );
            tokio::time::sleep(self.retry_interval).await;
        }
    }
}
