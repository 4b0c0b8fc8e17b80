//! Channel abstraction consumed by the shutdown coordinator.
//!
//! # Data Flow
//! ```text
//! Caller code
//!     → begin_call (local.rs) while the channel accepts work
//!     → CallGuard held for the duration of the call
//!
//! Shutdown coordinator (lifecycle/shutdown.rs):
//!     → current_state / has_pending_work (probe)
//!     → shutdown_gracefully → await_termination(grace)
//!     → shutdown_forcibly on deadline
//!
//! Channel States:
//!     Idle → Terminated
//!     Busy → Draining → Terminated
//! ```
//!
//! # Design Decisions
//! - Shutdown triggers are non-blocking; only await_termination suspends
//! - Terminated is absorbing: repeated shutdown calls are no-ops

pub mod local;

use async_trait::async_trait;
use std::time::Duration;

pub use local::{CallGuard, ChannelId, LocalChannel};

/// Observable lifecycle state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// Accepting work, nothing in flight.
    Idle,
    /// Accepting work, calls in flight.
    Busy,
    /// No longer accepting work, finishing in-flight calls.
    Draining,
    /// Closed. No calls in flight, none accepted.
    Terminated,
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChannelState::Idle => "idle",
            ChannelState::Busy => "busy",
            ChannelState::Draining => "draining",
            ChannelState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Errors reported by channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel {0} is not accepting new calls")]
    NotAccepting(String),

    #[error("channel {name} probe failed: {reason}")]
    Probe { name: String, reason: String },

    #[error("channel {name} shutdown failed: {reason}")]
    Shutdown { name: String, reason: String },
}

/// A closable channel whose shutdown can be driven from outside.
#[async_trait]
pub trait ManagedChannel: Send + Sync {
    /// Name used in logs and shutdown reports.
    fn name(&self) -> &str;

    fn current_state(&self) -> Result<ChannelState, ChannelError>;

    /// Whether any call is still in flight.
    fn has_pending_work(&self) -> Result<bool, ChannelError>;

    /// Stop accepting new calls and let in-flight calls finish. Returns
    /// without waiting.
    fn shutdown_gracefully(&self) -> Result<(), ChannelError>;

    /// Abort in-flight calls and close. Returns without waiting.
    fn shutdown_forcibly(&self) -> Result<(), ChannelError>;

    /// Wait up to `timeout` for the channel to terminate. Returns whether it
    /// did.
    async fn await_termination(&self, timeout: Duration) -> Result<bool, ChannelError>;
}
