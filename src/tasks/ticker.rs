use std::ops::ControlFlow;
use std::time::Duration;

use log::debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// A repeating background timer. The task is aborted when the `Ticker` is
/// cancelled or dropped, so holding one scopes the timer's lifetime.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a task on `runtime` that calls `on_tick` every `period`,
    /// starting one period from now. Returning `ControlFlow::Break` from the
    /// callback ends the task.
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);

            loop {
                interval.tick().await; // Wait for the next interval tick
                if on_tick().is_break() {
                    debug!("Ticker finished on its own");
                    break;
                }
            }
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the timer task. No further callback starts after this returns.
    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
