//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use throttle_drain::channel::{LocalChannel, ManagedChannel};
use throttle_drain::lifecycle::{ExitHook, ExitHookRegistry};

/// Open `calls` never-ending calls on `channel`. Each call ticks every 200ms
/// until the channel is force-terminated.
#[allow(dead_code)]
pub fn start_endless_calls(channel: &LocalChannel, calls: usize) -> Vec<JoinHandle<()>> {
    (0..calls)
        .map(|_| {
            let call = channel.begin_call().expect("channel should accept calls");
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(Duration::from_millis(200));
                loop {
                    tokio::select! {
                        _ = call.aborted() => break,
                        _ = ticker.tick() => {}
                    }
                }
            })
        })
        .collect()
}

/// Open one call on `channel` that finishes on its own after `after`.
#[allow(dead_code)]
pub fn start_finite_call(channel: &LocalChannel, after: Duration) -> JoinHandle<()> {
    let call = channel.begin_call().expect("channel should accept calls");
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        drop(call);
    })
}

#[allow(dead_code)]
pub fn as_managed(channels: &[LocalChannel]) -> Vec<Arc<dyn ManagedChannel>> {
    channels
        .iter()
        .map(|channel| Arc::new(channel.clone()) as Arc<dyn ManagedChannel>)
        .collect()
}

/// Registry that only records hooks, so tests decide when and how they run.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRegistry {
    hooks: Mutex<Vec<(String, ExitHook)>>,
}

#[allow(dead_code)]
impl RecordingRegistry {
    pub fn take(&self) -> Vec<(String, ExitHook)> {
        std::mem::take(&mut *self.hooks.lock().unwrap())
    }
}

impl ExitHookRegistry for RecordingRegistry {
    fn register_at_exit(&self, name: String, hook: ExitHook) {
        self.hooks.lock().unwrap().push((name, hook));
    }
}
