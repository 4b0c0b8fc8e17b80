//! In-process channel with call tracking.
//!
//! # Responsibilities
//! - Track in-flight calls (Idle/Busy → Draining → Terminated)
//! - Generate unique channel IDs for tracing
//! - Reject new calls once shutdown starts
//! - Signal in-flight calls when the channel is force-terminated

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::{ChannelError, ChannelState, ManagedChannel};

/// Process-unique channel identifier, shown as `chan-N` in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chan-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Draining,
    Terminated,
}

#[derive(Debug, Clone, Copy)]
struct Status {
    phase: Phase,
    in_flight: u64,
    forced: bool,
}

impl Status {
    fn state(&self) -> ChannelState {
        match (self.phase, self.in_flight) {
            (Phase::Open, 0) => ChannelState::Idle,
            (Phase::Open, _) => ChannelState::Busy,
            (Phase::Draining, _) => ChannelState::Draining,
            (Phase::Terminated, _) => ChannelState::Terminated,
        }
    }
}

/// A channel that counts in-flight calls and supports graceful and forced
/// shutdown.
///
/// All state transitions go through the watch sender, so every update is
/// atomic with respect to concurrent calls and waiters see each change.
#[derive(Debug, Clone)]
pub struct LocalChannel {
    id: ChannelId,
    name: Arc<str>,
    status: Arc<watch::Sender<Status>>,
}

impl LocalChannel {
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(Status {
            phase: Phase::Open,
            in_flight: 0,
            forced: false,
        });
        Self {
            id: ChannelId::next(),
            name: Arc::from(name.into()),
            status: Arc::new(tx),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Start a call. The returned guard keeps the call in flight until it is
    /// dropped.
    pub fn begin_call(&self) -> Result<CallGuard, ChannelError> {
        let accepted = self.status.send_if_modified(|status| {
            if status.phase == Phase::Open {
                status.in_flight += 1;
                true
            } else {
                false
            }
        });

        if !accepted {
            return Err(ChannelError::NotAccepting(self.name.to_string()));
        }

        tracing::trace!(channel = %self.name, channel_id = %self.id, "Call started");
        Ok(CallGuard {
            channel_id: self.id,
            status: Arc::clone(&self.status),
        })
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> u64 {
        self.status.borrow().in_flight
    }

    pub fn state(&self) -> ChannelState {
        self.status.borrow().state()
    }

    /// Whether the channel was closed by [`shutdown_forcibly`] rather than
    /// by draining.
    ///
    /// [`shutdown_forcibly`]: ManagedChannel::shutdown_forcibly
    pub fn was_forced(&self) -> bool {
        self.status.borrow().forced
    }
}

#[async_trait]
impl ManagedChannel for LocalChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_state(&self) -> Result<ChannelState, ChannelError> {
        Ok(self.state())
    }

    fn has_pending_work(&self) -> Result<bool, ChannelError> {
        let status = *self.status.borrow();
        Ok(status.phase != Phase::Terminated && status.in_flight > 0)
    }

    fn shutdown_gracefully(&self) -> Result<(), ChannelError> {
        self.status.send_if_modified(|status| {
            if status.phase != Phase::Open {
                return false;
            }
            status.phase = if status.in_flight == 0 {
                Phase::Terminated
            } else {
                Phase::Draining
            };
            true
        });
        tracing::debug!(
            channel = %self.name,
            channel_id = %self.id,
            state = %self.state(),
            "Graceful shutdown requested"
        );
        Ok(())
    }

    fn shutdown_forcibly(&self) -> Result<(), ChannelError> {
        let mut aborted = 0;
        self.status.send_if_modified(|status| {
            if status.phase == Phase::Terminated {
                return false;
            }
            aborted = status.in_flight;
            status.phase = Phase::Terminated;
            status.forced = aborted > 0;
            true
        });
        if aborted > 0 {
            tracing::debug!(
                channel = %self.name,
                channel_id = %self.id,
                aborted,
                "Aborted in-flight calls"
            );
        }
        Ok(())
    }

    async fn await_termination(&self, timeout: Duration) -> Result<bool, ChannelError> {
        let rx = self.status.subscribe();
        let terminated = wait_until(rx, |status| status.phase == Phase::Terminated);
        Ok(tokio::time::timeout(timeout, terminated).await.is_ok())
    }
}

/// Resolves once the watched status satisfies `done`, or the sender is gone.
async fn wait_until(mut rx: watch::Receiver<Status>, done: impl Fn(&Status) -> bool) {
    loop {
        let reached = done(&rx.borrow_and_update());
        if reached {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Guard that keeps a call in flight.
/// Decrements the channel's in-flight count when dropped.
#[derive(Debug)]
pub struct CallGuard {
    channel_id: ChannelId,
    status: Arc<watch::Sender<Status>>,
}

impl CallGuard {
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Resolves once [`shutdown_forcibly`] has aborted this call.
    ///
    /// A graceful drain never triggers it.
    ///
    /// [`shutdown_forcibly`]: ManagedChannel::shutdown_forcibly
    pub async fn aborted(&self) {
        wait_until(self.status.subscribe(), |status| {
            status.phase == Phase::Terminated && status.forced
        })
        .await
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.status.send_modify(|status| {
            status.in_flight = status.in_flight.saturating_sub(1);
            if status.phase == Phase::Draining && status.in_flight == 0 {
                status.phase = Phase::Terminated;
            }
        });
        tracing::trace!(channel_id = %self.channel_id, "Call finished");
    }
}
