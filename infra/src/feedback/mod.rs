//! Haptic feedback

pub mod haptics;

pub use haptics::ConsoleHaptics;
