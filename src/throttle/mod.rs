//! Admission throttling subsystem.
//!
//! # Data Flow
//! ```text
//! caller → on_ready(action)
//!     → wait for the gate (FIFO among callers)
//!     → wait out the remainder of min_interval since the last start
//!     → record start instant
//!     → run action, return its output
//! ```
//!
//! # Design Decisions
//! - The gate is held for the whole action, so actions never overlap
//! - Spacing is measured between execution starts, not admission requests
//! - A dropped waiter leaves the queue without running its action

pub mod interval;

pub use interval::MinimumIntervalThrottler;
