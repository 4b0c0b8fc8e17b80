//! Channel shutdown coordination.
//!
//! Each channel is driven through its own bounded sequence:
//! idle channels close at once, busy channels get the grace period to
//! drain, and anything still open at the deadline is force-terminated.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::channel::{ChannelState, ManagedChannel};
use crate::config::ShutdownConfig;
use crate::observability::metrics;

/// How a single channel reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownOutcome {
    /// The channel was already terminated; nothing was done.
    AlreadyTerminated,
    /// The channel was idle and closed without waiting.
    Immediate,
    /// In-flight work finished within the grace period.
    Drained,
    /// The channel was force-terminated (deadline or probe failure).
    Forced,
    /// Even forced termination failed.
    Failed,
}

impl ShutdownOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownOutcome::AlreadyTerminated => "already_terminated",
            ShutdownOutcome::Immediate => "immediate",
            ShutdownOutcome::Drained => "drained",
            ShutdownOutcome::Forced => "forced",
            ShutdownOutcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ShutdownOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of shutting down one channel.
#[derive(Debug, Clone)]
pub struct ChannelShutdown {
    pub name: String,
    pub outcome: ShutdownOutcome,
    pub elapsed: Duration,
}

/// Shuts down many channels in parallel under one grace period.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownCoordinator {
    grace_period: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    pub fn from_config(config: &ShutdownConfig) -> Self {
        Self::new(config.grace_period())
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Shut down every channel concurrently and wait for all of them.
    ///
    /// Completes in roughly the grace period at most, no matter how many
    /// channels are busy. Failures stay confined to their own channel.
    pub async fn shutdown_all<I>(&self, channels: I) -> Vec<ChannelShutdown>
    where
        I: IntoIterator<Item = Arc<dyn ManagedChannel>>,
    {
        let grace_period = self.grace_period;
        let mut tasks = JoinSet::new();

        for channel in channels {
            tasks.spawn(shutdown_isolated(channel, grace_period));
        }

        tracing::info!(
            channels = tasks.len(),
            grace_period_ms = grace_period.as_millis() as u64,
            "Shutting down channels"
        );

        let mut reports = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!(error = %e, "Channel shutdown task did not complete"),
            }
        }

        tracing::info!(channels = reports.len(), "Channel shutdown complete");
        reports
    }
}

/// Runs [`shutdown_channel`] and contains a panicking channel.
///
/// A panic is treated like a failed probe: the channel gets one more
/// forced shutdown attempt, and is reported as [`ShutdownOutcome::Failed`]
/// only if that attempt fails too.
pub(crate) async fn shutdown_isolated(
    channel: Arc<dyn ManagedChannel>,
    grace_period: Duration,
) -> ChannelShutdown {
    let name = channel.name().to_string();
    let started = Instant::now();

    let outcome = match AssertUnwindSafe(shutdown_channel(channel.as_ref(), grace_period))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!(channel = %name, "Channel panicked during shutdown, forcing shutdown");
            match std::panic::catch_unwind(AssertUnwindSafe(|| force(channel.as_ref()))) {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::error!(channel = %name, "Forced shutdown panicked");
                    ShutdownOutcome::Failed
                }
            }
        }
    };

    let elapsed = started.elapsed();
    metrics::record_channel_shutdown(outcome.as_str(), elapsed);

    ChannelShutdown {
        name,
        outcome,
        elapsed,
    }
}

/// Drive one channel to termination within `grace_period`.
///
/// The drain wait is capped at `grace_period` here as well, so a channel
/// whose `await_termination` overruns its timeout is still forced on time.
pub async fn shutdown_channel(
    channel: &dyn ManagedChannel,
    grace_period: Duration,
) -> ShutdownOutcome {
    let name = channel.name();

    let state = match channel.current_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(channel = %name, error = %e, "State probe failed, forcing shutdown");
            return force(channel);
        }
    };

    match state {
        ChannelState::Terminated => {
            tracing::debug!(channel = %name, "Channel already terminated");
            return ShutdownOutcome::AlreadyTerminated;
        }
        ChannelState::Idle => match channel.has_pending_work() {
            Ok(false) => {
                tracing::info!(channel = %name, "Channel idle, closing immediately");
                return match channel.shutdown_forcibly() {
                    Ok(()) => ShutdownOutcome::Immediate,
                    Err(e) => {
                        tracing::error!(
                            channel = %name,
                            error = %e,
                            "Failed to close idle channel"
                        );
                        ShutdownOutcome::Failed
                    }
                };
            }
            Ok(true) => {}
            Err(e) => {
                tracing::warn!(
                    channel = %name,
                    error = %e,
                    "Pending work probe failed, forcing shutdown"
                );
                return force(channel);
            }
        },
        ChannelState::Busy | ChannelState::Draining => {}
    }

    if let Err(e) = channel.shutdown_gracefully() {
        tracing::warn!(channel = %name, error = %e, "Graceful shutdown failed, forcing shutdown");
        return force(channel);
    }

    tracing::info!(
        channel = %name,
        grace_period_ms = grace_period.as_millis() as u64,
        "Channel busy, draining"
    );

    match tokio::time::timeout(grace_period, channel.await_termination(grace_period)).await {
        Ok(Ok(true)) => {
            tracing::info!(channel = %name, "Channel drained");
            ShutdownOutcome::Drained
        }
        Ok(Ok(false)) | Err(_) => {
            tracing::warn!(channel = %name, "Grace period expired, forcing shutdown");
            force(channel)
        }
        Ok(Err(e)) => {
            tracing::warn!(
                channel = %name,
                error = %e,
                "Waiting for termination failed, forcing shutdown"
            );
            force(channel)
        }
    }
}

fn force(channel: &dyn ManagedChannel) -> ShutdownOutcome {
    match channel.shutdown_forcibly() {
        Ok(()) => ShutdownOutcome::Forced,
        Err(e) => {
            tracing::error!(channel = %channel.name(), error = %e, "Forced shutdown failed");
            ShutdownOutcome::Failed
        }
    }
}
