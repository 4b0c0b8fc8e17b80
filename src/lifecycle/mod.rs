//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (hooks.rs):
//!     add_channel_shutdown_hooks → one exit hook per channel
//!
//! Exit (signals.rs):
//!     SIGTERM/SIGINT → ShutdownHooks::run → all hooks concurrently
//!
//! Per channel (shutdown.rs):
//!     Idle → close now
//!     Busy → drain up to grace period → force on deadline
//! ```
//!
//! # Design Decisions
//! - One hook per channel, not one per batch
//! - Shutdown has a deadline: forced close after the grace period
//! - A failing channel never blocks its siblings

pub mod hooks;
pub mod shutdown;
pub mod signals;

pub use hooks::{add_channel_shutdown_hooks, ExitHook, ExitHookRegistry, ShutdownHooks};
pub use shutdown::{shutdown_channel, ChannelShutdown, ShutdownCoordinator, ShutdownOutcome};
