//! One OTP challenge and its phases

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use citi_shared::config::VerificationConfig;
use citi_shared::utils::phone::{digits_only, format_uk_display};
use citi_shared::utils::validation::format_countdown;

use crate::services::attempts::AttemptTracker;

/// Phase of the code-entry state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPhase {
    /// Waiting for digits
    Entering,
    /// Full code entered, waiting for the simulated check
    Submitting,
    /// Code accepted
    Success,
    /// Attempt limit reached; only a resend leaves this phase
    LockedOut,
    /// Entry window elapsed; typing is still accepted
    Expired,
}

impl VerificationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationPhase::Success)
    }

    /// Whether typed digits are taken into the code
    pub fn accepts_input(&self) -> bool {
        matches!(self, VerificationPhase::Entering | VerificationPhase::Expired)
    }
}

/// Where the code was sent and where confirmation goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone_number: String,
    pub email: Option<String>,
}

impl ContactInfo {
    pub fn new(phone_number: impl Into<String>, email: Option<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            email,
        }
    }
}

/// Keep the digits of `text`, at most `code_length` of them
pub fn sanitize_code(text: &str, code_length: usize) -> String {
    digits_only(text).chars().take(code_length).collect()
}

/// State of one OTP challenge.
///
/// Mutated only by [`super::VerificationStateMachine`]; everything else
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSession {
    pub(super) id: Uuid,
    pub(super) contact: ContactInfo,
    pub(super) expected_code: String,
    pub(super) entered_code: String,
    pub(super) code_length: usize,
    pub(super) attempts: AttemptTracker,
    pub(super) entry_window_seconds: u32,
    pub(super) resend_window_seconds: u32,
    pub(super) entry_window_remaining: u32,
    pub(super) resend_window_remaining: u32,
    pub(super) phase: VerificationPhase,
}

impl VerificationSession {
    pub fn new(contact: ContactInfo, config: &VerificationConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact,
            expected_code: config.expected_code.clone(),
            entered_code: String::new(),
            code_length: config.code_length,
            attempts: AttemptTracker::new(config.max_attempts),
            entry_window_seconds: config.entry_window_seconds,
            resend_window_seconds: config.resend_window_seconds,
            entry_window_remaining: config.entry_window_seconds,
            resend_window_remaining: config.resend_window_seconds,
            phase: VerificationPhase::Entering,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn phase(&self) -> VerificationPhase {
        self.phase
    }

    pub fn entered_code(&self) -> &str {
        &self.entered_code
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts.count()
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.attempts.remaining()
    }

    pub fn is_locked(&self) -> bool {
        self.attempts.is_locked_out()
    }

    pub fn entry_window_remaining(&self) -> u32 {
        self.entry_window_remaining
    }

    pub fn resend_window_remaining(&self) -> u32 {
        self.resend_window_remaining
    }

    pub fn can_resend(&self) -> bool {
        self.resend_window_remaining == 0 && !self.phase.is_terminal()
    }

    /// Phase to fall back to after a failed submission
    pub(super) fn idle_phase(&self) -> VerificationPhase {
        if self.entry_window_remaining == 0 {
            VerificationPhase::Expired
        } else {
            VerificationPhase::Entering
        }
    }

    /// Instruction line shown above the code boxes
    pub fn prompt(&self) -> String {
        format!(
            "We've sent a {}-digit code to {}",
            self.code_length,
            format_uk_display(&self.contact.phone_number)
        )
    }

    /// Hint shown under the code boxes for the current phase
    pub fn status_hint(&self) -> String {
        match self.phase {
            VerificationPhase::Entering if self.attempts.count() > 0 => format!(
                "Invalid code. {} attempts remaining.",
                self.attempts.remaining()
            ),
            VerificationPhase::Entering => format!(
                "Code expires in {}",
                format_countdown(self.entry_window_remaining)
            ),
            VerificationPhase::Submitting => String::from("Verifying..."),
            VerificationPhase::Success => String::from("Account Activated!"),
            VerificationPhase::LockedOut => {
                String::from("Too Many Attempts. Please request a new code.")
            }
            VerificationPhase::Expired => String::from("Code entry time elapsed."),
        }
    }

    /// Resend line: countdown while the window is open, action once it closes
    pub fn resend_hint(&self) -> String {
        if self.resend_window_remaining > 0 {
            format!(
                "Didn't receive code? Resend available in {}",
                format_countdown(self.resend_window_remaining)
            )
        } else {
            String::from("Resend Code")
        }
    }
}
