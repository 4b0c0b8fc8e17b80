//! Exit hook registry.
//!
//! The host application owns a [`ShutdownHooks`] and drives it from its own
//! exit path (see `signals::run_hooks_on_signal`). Hooks run once, all at
//! the same time.

use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;

use crate::channel::ManagedChannel;
use crate::lifecycle::shutdown::shutdown_isolated;

/// A hook run during process shutdown.
pub type ExitHook = BoxFuture<'static, ()>;

/// Something that accepts hooks to run at exit.
pub trait ExitHookRegistry {
    fn register_at_exit(&self, name: String, hook: ExitHook);
}

/// Registry of named exit hooks.
#[derive(Default)]
pub struct ShutdownHooks {
    hooks: Mutex<Vec<(String, ExitHook)>>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hooks waiting to run.
    pub fn len(&self) -> usize {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every registered hook concurrently and wait for all of them.
    ///
    /// Hooks are taken out of the registry, so a second call runs nothing.
    /// Returns how many hooks were run.
    pub async fn run(&self) -> usize {
        let hooks = std::mem::take(&mut *self.hooks.lock().unwrap_or_else(PoisonError::into_inner));
        let count = hooks.len();
        if count == 0 {
            return 0;
        }

        tracing::info!(hooks = count, "Running exit hooks");

        let mut tasks = JoinSet::new();
        for (name, hook) in hooks {
            tasks.spawn(async move {
                hook.await;
                name
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(name) => tracing::debug!(hook = %name, "Exit hook finished"),
                Err(e) => tracing::error!(error = %e, "Exit hook failed"),
            }
        }

        count
    }
}

impl ExitHookRegistry for ShutdownHooks {
    fn register_at_exit(&self, name: String, hook: ExitHook) {
        tracing::debug!(hook = %name, "Registering exit hook");
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, hook));
    }
}

impl std::fmt::Debug for ShutdownHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHooks")
            .field("pending", &self.len())
            .finish()
    }
}

/// Register one exit hook per channel. Each hook drains its channel for up
/// to `grace_period` and then forces it closed.
pub fn add_channel_shutdown_hooks<R, I>(registry: &R, grace_period: Duration, channels: I)
where
    R: ExitHookRegistry + ?Sized,
    I: IntoIterator<Item = Arc<dyn ManagedChannel>>,
{
    for channel in channels {
        let name = format!("channel-shutdown:{}", channel.name());
        registry.register_at_exit(
            name,
            Box::pin(async move {
                let report = shutdown_isolated(channel, grace_period).await;
                tracing::info!(
                    channel = %report.name,
                    outcome = %report.outcome,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Channel shutdown hook finished"
                );
            }),
        );
    }
}
