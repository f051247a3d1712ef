//! # CiTiApp Core
//!
//! Core logic of the CiTiApp registration wizard.
//! This crate contains the registration record and navigation entities,
//! the countdown timers, the OTP verification state machine and the flow
//! that ties them together, plus the error types shared by all of them.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
