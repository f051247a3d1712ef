//! Phone verification module for the registration wizard
//!
//! This module provides the code-entry workflow:
//! - A pure state machine over the entry phases
//! - Attempt tracking with lockout
//! - Entry and resend countdowns
//! - Integration with code delivery, notification and haptic collaborators

mod controller;
mod session;
mod state_machine;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use controller::VerificationController;
pub use session::{sanitize_code, ContactInfo, VerificationPhase, VerificationSession};
pub use state_machine::{VerificationAction, VerificationEvent, VerificationStateMachine};
pub use traits::{Collaborators, CodeDeliveryTrait, HapticFeedbackTrait, NotificationServiceTrait};
pub use types::{
    ConfirmationMessage, FeedbackSignal, VerificationOutcome, ACCOUNT_FEATURES,
    CONFIRMATION_SUBJECT,
};
