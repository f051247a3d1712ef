//! Haptics for a terminal: every signal becomes a log line

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use citi_core::services::{FeedbackSignal, HapticFeedbackTrait};

#[derive(Debug, Clone, Default)]
pub struct ConsoleHaptics {
    signal_count: Arc<AtomicU64>,
}

impl ConsoleHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_signal_count(&self) -> u64 {
        self.signal_count.load(Ordering::SeqCst)
    }
}

impl HapticFeedbackTrait for ConsoleHaptics {
    fn signal(&self, signal: FeedbackSignal) {
        self.signal_count.fetch_add(1, Ordering::SeqCst);
        debug!(target: "haptics", signal = ?signal, "Haptic feedback");
    }
}
