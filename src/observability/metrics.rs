//! Metrics recording.
//!
//! # Metrics
//! - `throttler_admissions_total` (counter): actions admitted by throttlers
//! - `throttler_wait_seconds` (histogram): time from request to admission
//! - `channel_shutdowns_total` (counter): channel shutdowns by outcome
//! - `channel_shutdown_duration_seconds` (histogram): per-channel shutdown time
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs an exporter
//! - Without an installed recorder every call is a no-op

use std::time::Duration;

use ::metrics::{counter, histogram};

pub fn record_throttler_admission(waited: Duration) {
    counter!("throttler_admissions_total").increment(1);
    histogram!("throttler_wait_seconds").record(waited.as_secs_f64());
}

pub fn record_channel_shutdown(outcome: &'static str, elapsed: Duration) {
    counter!("channel_shutdowns_total", "outcome" => outcome).increment(1);
    histogram!("channel_shutdown_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
