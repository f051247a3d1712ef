//! `TaskScheduler` backed by tokio timers
//!
//! Every scheduled task is a spawned tokio task that sends its id into an
//! unbounded channel when it fires. The owner of the receiving end hands
//! the ids back to whoever scheduled them. Cancelling aborts the spawned
//! task; an id already sitting in the channel is still delivered and must
//! be ignored by its (former) owner.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use citi_core::services::{TaskId, TaskScheduler};

/// Scheduler for the real process. Must be used inside a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<TaskId, JoinHandle<()>>,
    wakeups: mpsc::UnboundedSender<TaskId>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its wake-ups arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TaskId>) {
        let (wakeups, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            wakeups,
        };
        (scheduler, receiver)
    }

    /// Number of tasks that have not finished or been cancelled
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|handle| !handle.is_finished()).count()
    }

    fn allocate(&mut self) -> TaskId {
        self.tasks.retain(|_, handle| !handle.is_finished());
        self.next_id += 1;
        TaskId::new(self.next_id)
    }
}

impl TaskScheduler for TokioScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TaskId {
        let id = self.allocate();
        let wakeups = self.wakeups.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if wakeups.send(id).is_err() {
                    break;
                }
            }
        });
        trace!(task = %id, period_ms = period.as_millis() as u64, "Scheduled repeating task");
        self.tasks.insert(id, handle);
        id
    }

    fn schedule_once(&mut self, delay: Duration) -> TaskId {
        let id = self.allocate();
        let wakeups = self.wakeups.clone();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = wakeups.send(id);
        });
        trace!(task = %id, delay_ms = delay.as_millis() as u64, "Scheduled one-shot task");
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TaskId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
            trace!(task = %id, "Cancelled task");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
