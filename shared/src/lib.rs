//! Shared utilities and configuration for the CiTiApp registration core
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types (verification, latency, logging)
//! - Utility functions (phone input, validation, countdown formatting)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, LatencyConfig, LogFormat, LoggingConfig, VerificationConfig,
};
pub use utils::{phone, validation};
