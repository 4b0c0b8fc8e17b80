//! Minimum-interval throttler with FIFO admission.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::config::ThrottleConfig;
use crate::observability::metrics;

/// Runs actions one at a time, starting each at least `min_interval` after
/// the previous one started.
///
/// Waiting callers are admitted in the order they called [`on_ready`]. The
/// gate is a [`tokio::sync::Mutex`], which queues lock requests fairly and
/// unlinks a waiter whose future is dropped.
///
/// [`on_ready`]: MinimumIntervalThrottler::on_ready
#[derive(Debug)]
pub struct MinimumIntervalThrottler<C = SystemClock> {
    clock: C,
    min_interval: Duration,
    /// Start instant of the most recently started action.
    last_start: Mutex<Option<Instant>>,
}

impl MinimumIntervalThrottler<SystemClock> {
    /// Create a throttler on the runtime clock.
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(SystemClock, min_interval)
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.min_interval())
    }
}

impl<C: Clock> MinimumIntervalThrottler<C> {
    /// Create a throttler reading time from `clock`.
    pub fn with_clock(clock: C, min_interval: Duration) -> Self {
        Self {
            clock,
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    /// The configured spacing between execution starts.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for admission, then run `action` and return its output unchanged.
    ///
    /// Admission requires that no other action is running and that
    /// `min_interval` has passed since the last action started. The first
    /// call is admitted immediately.
    pub async fn on_ready<F, Fut, R>(&self, action: F) -> R
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let requested_at = self.clock.now();
        let mut last_start = self.last_start.lock().await;

        // The injected clock decides admission; sleeping only paces the
        // re-checks.
        if let Some(previous) = *last_start {
            loop {
                let elapsed = self.clock.now().saturating_duration_since(previous);
                if elapsed >= self.min_interval {
                    break;
                }
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        let started_at = self.clock.now();
        *last_start = Some(started_at);

        let waited = started_at.saturating_duration_since(requested_at);
        tracing::debug!(waited_ms = waited.as_millis() as u64, "Throttler admitted action");
        metrics::record_throttler_admission(waited);

        action().await
    }
}
