//! Recording collaborators for testing the verification flow

use std::sync::{Arc, Mutex};

use crate::services::verification::traits::{
    Collaborators, CodeDeliveryTrait, HapticFeedbackTrait, NotificationServiceTrait,
};
use crate::services::verification::types::{ConfirmationMessage, FeedbackSignal};

// Mock code delivery
#[derive(Default)]
pub struct MockDelivery {
    pub sent: Mutex<Vec<(String, String)>>,
    pub should_fail: bool,
}

impl MockDelivery {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl CodeDeliveryTrait for MockDelivery {
    fn deliver_code(&self, phone: &str, code: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("delivery unavailable".to_string());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((phone.to_string(), code.to_string()));
        Ok(format!("mock-msg-{}", sent.len()))
    }
}

// Mock notifier
#[derive(Default)]
pub struct MockNotifier {
    pub messages: Mutex<Vec<ConfirmationMessage>>,
}

impl MockNotifier {
    pub fn sent(&self) -> Vec<ConfirmationMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationServiceTrait for MockNotifier {
    fn send_confirmation(&self, message: &ConfirmationMessage) -> Result<String, String> {
        self.messages.lock().unwrap().push(message.clone());
        Ok("mock-mail".to_string())
    }
}

// Mock haptics
#[derive(Default)]
pub struct MockHaptics {
    pub signals: Mutex<Vec<FeedbackSignal>>,
}

impl MockHaptics {
    pub fn signals(&self) -> Vec<FeedbackSignal> {
        self.signals.lock().unwrap().clone()
    }
}

impl HapticFeedbackTrait for MockHaptics {
    fn signal(&self, signal: FeedbackSignal) {
        self.signals.lock().unwrap().push(signal);
    }
}

/// Mock collaborators plus handles for inspecting them
pub struct Recorders {
    pub delivery: Arc<MockDelivery>,
    pub notifier: Arc<MockNotifier>,
    pub haptics: Arc<MockHaptics>,
}

impl Recorders {
    pub fn new() -> Self {
        Self {
            delivery: Arc::new(MockDelivery::default()),
            notifier: Arc::new(MockNotifier::default()),
            haptics: Arc::new(MockHaptics::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.delivery.clone(),
            self.notifier.clone(),
            self.haptics.clone(),
        )
    }
}
