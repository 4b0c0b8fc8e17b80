//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! throttle / lifecycle / channel:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (no-op until a recorder is installed)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
