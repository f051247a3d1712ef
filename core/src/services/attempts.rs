//! Failed verification attempt counting

use serde::{Deserialize, Serialize};

use citi_shared::config::verification::DEFAULT_MAX_ATTEMPTS;

/// Counts failed submissions and signals lockout at a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTracker {
    failures: u32,
    max_attempts: u32,
}

impl Default for AttemptTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl AttemptTracker {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            failures: 0,
            max_attempts,
        }
    }

    /// Count one failed submission and return the new total
    pub fn record_failure(&mut self) -> u32 {
        self.failures += 1;
        self.failures
    }

    pub fn is_locked_out(&self) -> bool {
        self.failures >= self.max_attempts
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn count(&self) -> u32 {
        self.failures
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Attempts left before lockout (0 once locked)
    pub fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.failures)
    }
}
