//! Restartable once-per-second countdown

use std::time::Duration;

use super::scheduler::{TaskId, TaskScheduler};

/// Tick period of every countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Result of handing a wake-up to a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Not this timer's current task (stale, cancelled or foreign)
    Ignored,
    /// One second elapsed
    Ticked { remaining: u32 },
    /// Remaining reached zero. Reported exactly once per start.
    Expired,
}

/// Countdown in whole seconds.
///
/// `remaining()` never increases while running and never goes below zero.
/// After `cancel()` the value freezes and no later wake-up is accepted.
#[derive(Debug, Default)]
pub struct CountdownTimer {
    remaining: u32,
    task: Option<TaskId>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin counting down from `duration_seconds`. A timer that is still
    /// running is cancelled first.
    pub fn start(&mut self, duration_seconds: u32, scheduler: &mut dyn TaskScheduler) {
        self.cancel(scheduler);
        self.remaining = duration_seconds;
        self.task = Some(scheduler.schedule_repeating(TICK_PERIOD));
    }

    /// Same as `cancel()` followed by `start()`
    pub fn restart(&mut self, duration_seconds: u32, scheduler: &mut dyn TaskScheduler) {
        self.start(duration_seconds, scheduler);
    }

    /// Stop ticking and release the scheduled task
    pub fn cancel(&mut self, scheduler: &mut dyn TaskScheduler) {
        if let Some(task) = self.task.take() {
            scheduler.cancel(task);
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Whether `id` is this timer's live task
    pub fn owns(&self, id: TaskId) -> bool {
        self.task == Some(id)
    }

    /// Handle a scheduler wake-up
    pub fn on_tick(&mut self, id: TaskId, scheduler: &mut dyn TaskScheduler) -> TimerTick {
        if !self.owns(id) {
            return TimerTick::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.cancel(scheduler);
            TimerTick::Expired
        } else {
            TimerTick::Ticked {
                remaining: self.remaining,
            }
        }
    }
}
