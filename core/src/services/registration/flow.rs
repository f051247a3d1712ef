//! Registration flow orchestration
//!
//! Ties the store, the step gate and the verification controller together
//! and runs the simulated backend operations (sending the code, creating
//! the account, redirecting home) on the task scheduler.

use tracing::{debug, info, warn};

use citi_shared::config::{AppConfig, LatencyConfig, VerificationConfig};
use citi_shared::utils::phone::{accept_phone_input, mask_phone_number};

use crate::domain::entities::navigation::{NavigationParams, Step, EMAIL_PARAM, PHONE_NUMBER_PARAM};
use crate::domain::entities::registration::{RecordField, RegistrationRecord, SignupMethod};
use crate::errors::{FlowError, FlowResult};
use crate::services::timer::{TaskId, TaskScheduler};
use crate::services::verification::{
    Collaborators, ContactInfo, FeedbackSignal, VerificationController, VerificationOutcome,
};

use super::gate;
use super::store::RegistrationStore;

/// What a flow call or wake-up produced, for the UI layer to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Navigated { step: Step },
    /// Code request accepted; the spinner runs until `CodeSent`
    SendingCode,
    CodeSent { phone_number: String },
    Verification(VerificationOutcome),
    /// Account request accepted; the spinner runs until `AccountCreated`
    CreatingAccount,
    AccountCreated,
    /// Wizard finished and navigation was reset
    RedirectHome,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOperation {
    SendCode,
    CreateAccount,
    Redirect,
}

/// The signup wizard
pub struct RegistrationFlow {
    store: RegistrationStore,
    verification_config: VerificationConfig,
    latency: LatencyConfig,
    collaborators: Collaborators,
    verification: Option<VerificationController>,
    pending: Option<(TaskId, PendingOperation)>,
}

impl RegistrationFlow {
    pub fn new(config: &AppConfig, collaborators: Collaborators) -> Self {
        Self {
            store: RegistrationStore::new(),
            verification_config: config.verification.clone(),
            latency: config.latency.clone(),
            collaborators,
            verification: None,
            pending: None,
        }
    }

    pub fn store(&self) -> &RegistrationStore {
        &self.store
    }

    pub fn record(&self) -> &RegistrationRecord {
        self.store.record()
    }

    pub fn current_step(&self) -> Step {
        self.store.current_step()
    }

    /// The open verification session, while on the code-entry step
    pub fn verification(&self) -> Option<&VerificationController> {
        self.verification.as_ref()
    }

    /// A simulated operation is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the current step's forward action is enabled
    pub fn can_continue(&self) -> bool {
        !self.is_busy() && gate::can_advance(self.current_step(), self.store.record())
    }

    /// Merge one field into the record. The phone number is frozen while a
    /// code for it is being verified; `edit_phone_number` releases it.
    pub fn update_field(&mut self, field: RecordField) -> FlowResult<()> {
        if let RecordField::PhoneNumber(raw) = &field {
            let current = &self.store.record().phone_number;
            if self.verification.is_some() && accept_phone_input(current, raw) != *current {
                return Err(FlowError::PhoneNumberLocked);
            }
        }
        self.store.update_record_field(field);
        Ok(())
    }

    /// Pick a signup method on the landing step
    pub fn choose_signup_method(&mut self, method: SignupMethod) -> FlowResult<FlowEvent> {
        self.expect_step(Step::Signup)?;
        self.store
            .update_record_field(RecordField::SignupMethod(method));
        info!(method = ?method, event = "signup_started", "Signup started");
        Ok(self.navigate(Step::NameEmail, NavigationParams::new()))
    }

    /// The current step's "Continue" action
    pub fn continue_from_current(
        &mut self,
        scheduler: &mut dyn TaskScheduler,
    ) -> FlowResult<FlowEvent> {
        self.ensure_idle()?;
        match self.current_step() {
            Step::Signup => self.choose_signup_method(SignupMethod::RegistrationForm),
            Step::NameEmail => self.advance_to(Step::GenderAge),
            Step::GenderAge => self.advance_to(Step::Phone),
            Step::Phone => self.send_code(scheduler),
            Step::VerifyCode => self.advance_to(Step::Finalize),
            Step::Finalize => self.create_account(scheduler),
        }
    }

    /// Request a verification code for the phone number on record
    pub fn send_code(&mut self, scheduler: &mut dyn TaskScheduler) -> FlowResult<FlowEvent> {
        self.expect_step(Step::Phone)?;
        self.ensure_idle()?;
        gate::check_step(Step::Phone, self.store.record())?;

        self.collaborators.haptics.signal(FeedbackSignal::LightImpact);
        let task = scheduler.schedule_once(self.latency.send_code());
        self.pending = Some((task, PendingOperation::SendCode));

        info!(
            phone = %mask_phone_number(&self.store.record().phone_number),
            event = "code_requested",
            "Verification code requested"
        );
        Ok(FlowEvent::SendingCode)
    }

    /// Replace the code field's content
    pub fn input_code(
        &mut self,
        text: &str,
        scheduler: &mut dyn TaskScheduler,
    ) -> FlowResult<VerificationOutcome> {
        let controller = self.verification.as_mut().ok_or(FlowError::NoActiveSession)?;
        Ok(controller.input(text, scheduler))
    }

    /// Append typed digits to the code field
    pub fn push_code_digits(
        &mut self,
        digits: &str,
        scheduler: &mut dyn TaskScheduler,
    ) -> FlowResult<VerificationOutcome> {
        let controller = self.verification.as_mut().ok_or(FlowError::NoActiveSession)?;
        Ok(controller.push_digits(digits, scheduler))
    }

    pub fn resend_code(
        &mut self,
        scheduler: &mut dyn TaskScheduler,
    ) -> FlowResult<VerificationOutcome> {
        let controller = self.verification.as_mut().ok_or(FlowError::NoActiveSession)?;
        Ok(controller.request_resend(scheduler))
    }

    /// Leave the code-entry step to correct the phone number
    pub fn edit_phone_number(
        &mut self,
        scheduler: &mut dyn TaskScheduler,
    ) -> FlowResult<FlowEvent> {
        self.expect_step(Step::VerifyCode)?;
        self.close_verification(scheduler);
        Ok(self.navigate(Step::Phone, NavigationParams::new()))
    }

    /// Pop one step. Anything in flight on the current step is cancelled,
    /// except a pending redirect, which finishes immediately instead.
    pub fn go_back(&mut self, scheduler: &mut dyn TaskScheduler) -> bool {
        if let Some((task, PendingOperation::Redirect)) = self.pending {
            scheduler.cancel(task);
            self.pending = None;
            self.complete(PendingOperation::Redirect, scheduler);
            return true;
        }
        if !self.store.can_go_back() {
            return false;
        }
        self.cancel_pending(scheduler);
        self.close_verification(scheduler);
        self.store.go_back()
    }

    /// Create the account from a complete, verified record
    pub fn create_account(&mut self, scheduler: &mut dyn TaskScheduler) -> FlowResult<FlowEvent> {
        self.expect_step(Step::Finalize)?;
        self.ensure_idle()?;
        gate::check_step(Step::Finalize, self.store.record())?;

        let task = scheduler.schedule_once(self.latency.account_creation());
        self.pending = Some((task, PendingOperation::CreateAccount));
        info!(event = "account_requested", "Account creation requested");
        Ok(FlowEvent::CreatingAccount)
    }

    /// Drop the whole signup and return to the landing step
    pub fn abandon(&mut self, scheduler: &mut dyn TaskScheduler) -> FlowEvent {
        self.cancel_pending(scheduler);
        self.close_verification(scheduler);
        self.store.discard_record();
        self.store.reset_to_initial();
        info!(event = "signup_abandoned", "Signup abandoned");
        FlowEvent::Abandoned
    }

    /// Handle a scheduler wake-up. Returns `None` for stale or foreign tasks.
    pub fn handle_wakeup(
        &mut self,
        id: TaskId,
        scheduler: &mut dyn TaskScheduler,
    ) -> Option<FlowEvent> {
        if let Some((task, operation)) = self.pending {
            if task == id {
                self.pending = None;
                return Some(self.complete(operation, scheduler));
            }
        }

        let outcome = self.verification.as_mut()?.handle_wakeup(id, scheduler)?;
        if let Some(contact) = outcome.completed.clone() {
            self.on_verified(contact, scheduler);
        }
        Some(FlowEvent::Verification(outcome))
    }

    fn complete(
        &mut self,
        operation: PendingOperation,
        scheduler: &mut dyn TaskScheduler,
    ) -> FlowEvent {
        match operation {
            PendingOperation::SendCode => {
                let record = self.store.record();
                let phone_number = record.phone_number.clone();
                let email = Some(record.email.clone()).filter(|email| !email.is_empty());

                self.store
                    .update_record_field(RecordField::PhoneVerified(false));
                self.close_verification(scheduler);
                self.verification = Some(VerificationController::open(
                    ContactInfo::new(phone_number.clone(), email.clone()),
                    &self.verification_config,
                    self.latency.verify(),
                    self.collaborators.clone(),
                    scheduler,
                ));

                let mut params = NavigationParams::new().with(PHONE_NUMBER_PARAM, phone_number.clone());
                if let Some(email) = email {
                    params = params.with(EMAIL_PARAM, email);
                }
                self.navigate(Step::VerifyCode, params);
                FlowEvent::CodeSent { phone_number }
            }
            PendingOperation::CreateAccount => {
                self.store.discard_record();
                let task = scheduler.schedule_once(self.latency.redirect());
                self.pending = Some((task, PendingOperation::Redirect));
                info!(event = "account_created", "Account created");
                FlowEvent::AccountCreated
            }
            PendingOperation::Redirect => {
                self.store.reset_to_initial();
                info!(event = "redirect_home", "Registration finished");
                FlowEvent::RedirectHome
            }
        }
    }

    fn on_verified(&mut self, contact: ContactInfo, scheduler: &mut dyn TaskScheduler) {
        self.close_verification(scheduler);
        if contact.phone_number != self.store.record().phone_number {
            warn!(
                phone = %mask_phone_number(&contact.phone_number),
                "Verified number no longer matches the record"
            );
            return;
        }
        self.store
            .update_record_field(RecordField::PhoneVerified(true));
        self.navigate(Step::Finalize, NavigationParams::new());
    }

    fn advance_to(&mut self, next: Step) -> FlowResult<FlowEvent> {
        gate::check_step(self.current_step(), self.store.record())?;
        Ok(self.navigate(next, NavigationParams::new()))
    }

    fn navigate(&mut self, step: Step, params: NavigationParams) -> FlowEvent {
        self.store.navigate_to(step, params);
        FlowEvent::Navigated { step }
    }

    fn close_verification(&mut self, scheduler: &mut dyn TaskScheduler) {
        if let Some(controller) = self.verification.take() {
            controller.close(scheduler);
        }
    }

    fn cancel_pending(&mut self, scheduler: &mut dyn TaskScheduler) {
        if let Some((task, operation)) = self.pending.take() {
            scheduler.cancel(task);
            debug!(task = %task, operation = ?operation, "Pending operation cancelled");
        }
    }

    fn expect_step(&self, expected: Step) -> FlowResult<()> {
        let actual = self.current_step();
        if actual == expected {
            Ok(())
        } else {
            Err(FlowError::InvalidStep { expected, actual })
        }
    }

    fn ensure_idle(&self) -> FlowResult<()> {
        if self.is_busy() {
            Err(FlowError::Busy)
        } else {
            Ok(())
        }
    }
}
