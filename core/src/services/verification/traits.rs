//! Traits for code delivery, notification and haptic integration

use std::sync::Arc;

use super::types::{ConfirmationMessage, FeedbackSignal};

/// Trait for one-time code delivery (SMS or a stand-in)
pub trait CodeDeliveryTrait: Send + Sync {
    /// Deliver `code` to `phone`, returning a provider message id
    fn deliver_code(&self, phone: &str, code: &str) -> Result<String, String>;
}

/// Trait for confirmation messaging after a successful verification
pub trait NotificationServiceTrait: Send + Sync {
    /// Send a confirmation message, returning a provider message id
    fn send_confirmation(&self, message: &ConfirmationMessage) -> Result<String, String>;
}

/// Trait for device haptics
pub trait HapticFeedbackTrait: Send + Sync {
    fn signal(&self, signal: FeedbackSignal);
}

/// External collaborators shared by the verification controller and the
/// registration flow
#[derive(Clone)]
pub struct Collaborators {
    pub delivery: Arc<dyn CodeDeliveryTrait>,
    pub notifier: Arc<dyn NotificationServiceTrait>,
    pub haptics: Arc<dyn HapticFeedbackTrait>,
}

impl Collaborators {
    pub fn new(
        delivery: Arc<dyn CodeDeliveryTrait>,
        notifier: Arc<dyn NotificationServiceTrait>,
        haptics: Arc<dyn HapticFeedbackTrait>,
    ) -> Self {
        Self {
            delivery,
            notifier,
            haptics,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
