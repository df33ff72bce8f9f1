use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// One armed periodic tick.
///
/// The first tick fires one full period after arming. `on_tick` returning
/// false ends the task. Cancelling aborts the task; a tick that is already
/// running still completes, so callers gate on `generation` as well.
pub(crate) struct TickTimer {
    generation: u64,
    task: JoinHandle<()>,
}

impl TickTimer {
    pub(crate) fn arm<F>(runtime: &Handle, generation: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        // Read the clock through the runtime so paused test time is honored.
        let first = {
            let _enter = runtime.enter();
            Instant::now() + period
        };

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });

        Self { generation, task }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn cancel(self) {
        self.task.abort();
    }
}
