//! Concurrency coordination primitives.
//!
//! - [`throttle::MinimumIntervalThrottler`]: runs actions one at a time, in
//!   request order, spaced at least a minimum interval apart.
//! - [`lifecycle::ShutdownCoordinator`]: drains many channels in parallel,
//!   forcing any that outlive a grace period.

pub mod channel;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod db;
pub mod lifecycle;
pub mod observability;
pub mod throttle;

pub use channel::{ChannelState, LocalChannel, ManagedChannel};
pub use config::CoordinationConfig;
pub use lifecycle::{ShutdownCoordinator, ShutdownHooks};
pub use throttle::MinimumIntervalThrottler;
