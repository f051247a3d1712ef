//! Mock SMS Service Implementation
//!
//! A mock implementation of code delivery for development and testing.
//! This implementation logs SMS messages to the console instead of sending them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use citi_core::services::CodeDeliveryTrait;
use citi_shared::utils::phone::{format_uk_display, is_sendable_phone_number, mask_phone_number};

use crate::InfrastructureError;

/// Text in front of the code in every verification SMS
pub const VERIFICATION_MESSAGE_PREFIX: &str = "Your CiTiApp verification code is";

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Logs SMS messages to console
/// - Validates phone numbers
/// - Generates mock message IDs
/// - Tracks message count for testing
#[derive(Clone)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }

    /// "Send" an SMS to a national UK number
    pub fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        if !is_sendable_phone_number(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if self.simulate_failure {
            warn!(
                phone = %mask_phone_number(phone_number),
                "Mock SMS service simulating failure"
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let masked_phone = mask_phone_number(phone_number);

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("📱 MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", format_uk_display(phone_number));
            println!("Message ID: {}", message_id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            message_length = message.len(),
            "SMS sent successfully (mock)"
        );

        Ok(message_id)
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeDeliveryTrait for MockSmsService {
    fn deliver_code(&self, phone: &str, code: &str) -> Result<String, String> {
        let message = format!("{} {}", VERIFICATION_MESSAGE_PREFIX, code);
        self.send_sms(phone, &message).map_err(|e| e.to_string())
    }
}
