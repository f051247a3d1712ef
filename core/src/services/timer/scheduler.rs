//! Schedulable tasks with cancel tokens
//!
//! Owners schedule a wake-up and keep the returned [`TaskId`]. The driver
//! hands fired ids back to the owner, which compares them against the ids it
//! still holds. An id that was cancelled is never handed out again, so a
//! wake-up that races with its own cancellation is simply not recognised.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cancel token for one scheduled wake-up. Never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Scheduler abstraction used by timers and simulated latencies
pub trait TaskScheduler {
    /// Fire `id` every `period` until cancelled
    fn schedule_repeating(&mut self, period: Duration) -> TaskId;

    /// Fire `id` once after `delay`
    fn schedule_once(&mut self, delay: Duration) -> TaskId;

    /// Stop a task. Cancelling an unknown or finished task is a no-op.
    fn cancel(&mut self, id: TaskId);
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    due: Duration,
    period: Option<Duration>,
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Nothing fires until the clock is advanced. Tasks due at the same instant
/// fire in scheduling order.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskId, ScheduledTask>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time. Repeating tasks are re-armed for their next period.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TaskId> {
        let (id, task) = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= deadline)
            .min_by_key(|(id, task)| (task.due, **id))
            .map(|(id, task)| (*id, *task))?;

        self.now = self.now.max(task.due);
        match task.period {
            Some(period) => {
                if let Some(entry) = self.tasks.get_mut(&id) {
                    entry.due = task.due + period;
                }
            }
            None => {
                self.tasks.remove(&id);
            }
        }
        Some(id)
    }

    /// Advance the clock by `by`, handing every wake-up to `handler` in time
    /// order. The handler may schedule or cancel tasks; anything it schedules
    /// inside the window fires in the same call.
    pub fn run_for<F>(&mut self, by: Duration, mut handler: F)
    where
        F: FnMut(&mut Self, TaskId),
    {
        let deadline = self.now + by;
        while let Some(id) = self.pop_due(deadline) {
            handler(self, id);
        }
        self.now = deadline;
    }

    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }
}

impl TaskScheduler for VirtualScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TaskId {
        let id = self.allocate();
        self.tasks.insert(
            id,
            ScheduledTask {
                due: self.now + period,
                period: Some(period),
            },
        );
        id
    }

    fn schedule_once(&mut self, delay: Duration) -> TaskId {
        let id = self.allocate();
        self.tasks.insert(
            id,
            ScheduledTask {
                due: self.now + delay,
                period: None,
            },
        );
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.tasks.remove(&id);
    }
}
