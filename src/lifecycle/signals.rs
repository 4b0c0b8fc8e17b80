//! OS signal handling.
//!
//! SIGTERM and SIGINT (ctrl-c on non-unix targets) end the process; before
//! it exits, every registered exit hook runs.

use std::io;
use std::sync::Arc;

use crate::lifecycle::hooks::ShutdownHooks;

/// Wait for a termination signal. Returns the signal's name.
#[cfg(unix)]
pub async fn wait_for_termination() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            Ok("SIGINT")
        }
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

/// Wait for a termination signal. Returns the signal's name.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

/// Wait for a termination signal, then run all exit hooks.
///
/// Returns the number of hooks that ran.
pub async fn run_hooks_on_signal(hooks: Arc<ShutdownHooks>) -> io::Result<usize> {
    let signal = wait_for_termination().await?;
    tracing::info!(signal, "Termination signal received");
    Ok(hooks.run().await)
}
