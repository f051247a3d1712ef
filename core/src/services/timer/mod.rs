//! Countdown timers and the scheduler they run on.

mod countdown;
mod scheduler;

pub use countdown::{CountdownTimer, TimerTick, TICK_PERIOD};
pub use scheduler::{TaskId, TaskScheduler, VirtualScheduler};
