//! Registration state store
//!
//! Holds the in-progress record and the wizard position. Passed explicitly
//! to whoever needs it; there is no global instance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::navigation::{NavigationParams, NavigationState, Step};
use crate::domain::entities::registration::{RecordField, RegistrationRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStore {
    navigation: NavigationState,
    record: RegistrationRecord,
}

impl RegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Step {
        self.navigation.current_step()
    }

    pub fn history(&self) -> &[Step] {
        self.navigation.history()
    }

    pub fn params(&self) -> &NavigationParams {
        self.navigation.params()
    }

    pub fn can_go_back(&self) -> bool {
        self.navigation.can_go_back()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    /// Move to `step` and replace the params. Performs no validation.
    pub fn navigate_to(&mut self, step: Step, params: NavigationParams) {
        let from = self.navigation.current_step();
        self.navigation.push(step, params);
        debug!(
            from = %from,
            to = %step,
            depth = self.navigation.history().len(),
            "Navigated"
        );
    }

    /// Pop back one step. No-op when there is no history.
    pub fn go_back(&mut self) -> bool {
        let from = self.navigation.current_step();
        let moved = self.navigation.pop();
        if moved {
            debug!(from = %from, to = %self.navigation.current_step(), "Navigated back");
        }
        moved
    }

    /// Back to `Signup` with empty history and params. The record is kept.
    pub fn reset_to_initial(&mut self) {
        self.navigation.reset();
        debug!("Navigation reset");
    }

    pub fn update_record_field(&mut self, field: RecordField) {
        self.record.apply(field);
    }

    /// Drop everything entered so far
    pub fn discard_record(&mut self) {
        self.record = RegistrationRecord::new();
    }
}
