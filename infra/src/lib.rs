//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the CiTiApp
//! registration wizard. It provides stand-ins for the external services the
//! flow talks to and the tokio-backed scheduler the timers run on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **SMS**: mock verification code delivery
//! - **Notification**: mock confirmation e-mail
//! - **Feedback**: haptic signals written to the log
//! - **Scheduler**: `TaskScheduler` on top of tokio timers

use std::sync::Arc;

use citi_core::services::Collaborators;
use citi_shared::config::{AppConfig, Environment};

pub mod feedback;
pub mod notification;
pub mod scheduler;
pub mod sms;

pub use feedback::ConsoleHaptics;
pub use notification::MockEmailService;
pub use scheduler::TokioScheduler;
pub use sms::MockSmsService;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    pub sms: Arc<MockSmsService>,
    pub email: Arc<MockEmailService>,
    pub haptics: Arc<ConsoleHaptics>,
}

impl InfrastructureServices {
    /// Create the simulated services
    pub fn new(console_output: bool) -> Self {
        Self {
            sms: Arc::new(MockSmsService::with_options(console_output, false)),
            email: Arc::new(MockEmailService::with_options(console_output, false)),
            haptics: Arc::new(ConsoleHaptics::new()),
        }
    }

    /// Collaborator handles for the registration flow
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(self.sms.clone(), self.email.clone(), self.haptics.clone())
    }
}

impl Default for InfrastructureServices {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The mock SMS service
/// - The mock e-mail service
/// - Haptic logging
pub fn initialize(config: &AppConfig) -> InfrastructureServices {
    tracing::info!(
        environment = %config.environment,
        "Initializing infrastructure services..."
    );
    let services = InfrastructureServices::new(config.environment.is_debug());
    tracing::info!("Infrastructure services initialized successfully");
    services
}

/// Load application configuration from `.env` files and the environment
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();

    let config = AppConfig::from_env();
    validate_config(&config)?;
    Ok(config)
}

/// Reject configurations the verification flow cannot run with
pub fn validate_config(config: &AppConfig) -> Result<(), InfrastructureError> {
    let verification = &config.verification;
    if !verification.expected_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(InfrastructureError::Config(
            "expected code must contain digits only".to_string(),
        ));
    }
    if verification.expected_code.len() != verification.code_length {
        return Err(InfrastructureError::Config(format!(
            "expected code must have {} digits",
            verification.code_length
        )));
    }
    if verification.max_attempts == 0 {
        return Err(InfrastructureError::Config(
            "max attempts must be at least 1".to_string(),
        ));
    }
    if verification.entry_window_seconds == 0 || verification.resend_window_seconds == 0 {
        return Err(InfrastructureError::Config(
            "verification windows must be at least one second".to_string(),
        ));
    }
    Ok(())
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// E-mail service error
    #[error("Email service error: {0}")]
    Email(String),
}
