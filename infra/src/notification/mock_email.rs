//! Mock e-mail service that prints messages instead of sending them

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use citi_core::services::{ConfirmationMessage, NotificationServiceTrait};
use citi_shared::utils::validation::validators;

use crate::InfrastructureError;

/// Mock e-mail service for development and testing
///
/// Keeps every accepted message in an outbox so callers can inspect what
/// would have been sent.
#[derive(Clone)]
pub struct MockEmailService {
    message_count: Arc<AtomicU64>,
    outbox: Arc<Mutex<Vec<ConfirmationMessage>>>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            outbox: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            console_output,
        }
    }

    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Messages accepted so far, oldest first
    pub fn outbox(&self) -> Vec<ConfirmationMessage> {
        match self.outbox.lock() {
            Ok(outbox) => outbox.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn send_email(&self, message: &ConfirmationMessage) -> Result<String, InfrastructureError> {
        if !validators::is_valid_email(&message.to) {
            return Err(InfrastructureError::Email(format!(
                "Invalid recipient: {}",
                message.to
            )));
        }

        if self.simulate_failure {
            warn!(subject = %message.subject, "Mock email service simulating failure");
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_mail_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        match self.outbox.lock() {
            Ok(mut outbox) => outbox.push(message.clone()),
            Err(poisoned) => poisoned.into_inner().push(message.clone()),
        }

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("✉️  MOCK EMAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", message.to);
            println!("Subject: {}", message.subject);
            println!("{}", "-".repeat(60));
            println!("{}", message.body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "email_service",
            provider = "mock",
            message_id = %message_id,
            subject = %message.subject,
            "Email sent successfully (mock)"
        );

        Ok(message_id)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationServiceTrait for MockEmailService {
    fn send_confirmation(&self, message: &ConfirmationMessage) -> Result<String, String> {
        self.send_email(message).map_err(|e| e.to_string())
    }
}
