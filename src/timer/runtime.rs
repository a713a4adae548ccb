use std::collections::HashMap;
use std::time::Duration;

use async_channel::{Receiver, Sender, unbounded};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

use super::{Scheduler, Tick, TimerHandle};

/// Wall-clock timers backed by tokio tasks.
///
/// Fired ticks arrive on the receiver returned by [`TokioScheduler::new`].
/// An aborted task may already have queued its tick, so consumers must still
/// check the toast id carried by each tick.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: Sender<Tick>,
    next_handle: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new() -> (Self, Receiver<Tick>) {
        let (tx, rx) = unbounded();
        let scheduler = Self {
            tx,
            next_handle: 0,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }

    /// Timers scheduled and not yet finished or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, after: Duration, tick: Tick) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            sleep(after).await;
            if tx.send(tick).await.is_err() {
                trace!(?tick, "tick receiver dropped");
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
