//! Types for verification results and side-effect payloads

use serde::{Deserialize, Serialize};

use crate::errors::VerificationError;

use super::session::{ContactInfo, VerificationPhase, VerificationSession};

/// Haptic signal requested by the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSignal {
    /// Button press, e.g. "Send Code"
    LightImpact,
    SuccessNotification,
    ErrorNotification,
}

pub const CONFIRMATION_SUBJECT: &str = "Welcome to CiTiApp";

/// Features listed in the confirmation e-mail
pub const ACCOUNT_FEATURES: [&str; 5] = [
    "Report issues to the council",
    "Book paid collections",
    "Pay council tax, rent, utilities, fines",
    "View payment history",
    "See community experiences",
];

/// Confirmation e-mail handed to the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ConfirmationMessage {
    /// Fixed welcome message sent once the phone number is verified
    pub fn welcome(to: impl Into<String>) -> Self {
        let features: String = ACCOUNT_FEATURES
            .iter()
            .map(|feature| format!("• {}\n", feature))
            .collect();

        Self {
            to: to.into(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: format!(
                "Dear Esteemed User,\n\n\
                 Welcome to your CiTiApp account. You now have full access to the app \
                 and the following features:\n\n\
                 {}\n\
                 Thank you for choosing CiTiApp.\n\n\
                 Sincerely,\n\
                 The CiTiApp Team",
                features
            ),
        }
    }
}

/// Snapshot reported back to the caller after each controller call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub phase: VerificationPhase,
    pub attempts: u32,
    pub remaining_attempts: u32,
    /// Error raised by this step, if any
    pub error: Option<VerificationError>,
    /// Set exactly once, on the step that reached `Success`
    pub completed: Option<ContactInfo>,
}

impl VerificationOutcome {
    pub(super) fn snapshot(session: &VerificationSession) -> Self {
        Self {
            phase: session.phase(),
            attempts: session.attempt_count(),
            remaining_attempts: session.remaining_attempts(),
            error: None,
            completed: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.phase == VerificationPhase::Success
    }
}
