//! Monotonic time source.
//!
//! Components that compare timestamps take a [`Clock`] instead of calling
//! `Instant::now()` directly so tests can drive time deterministically.
//! [`SystemClock`] reads Tokio's clock, which follows `tokio::time::pause`.

use tokio::time::Instant;

/// A monotonic source of timestamps.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by the Tokio runtime's time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
