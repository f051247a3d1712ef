//! Verification controller
//!
//! Owns one [`VerificationSession`] together with its two countdowns and
//! the pending simulated check, and executes the actions produced by
//! [`VerificationStateMachine`].

use std::time::Duration;

use tracing::{debug, info, warn};

use citi_shared::config::VerificationConfig;
use citi_shared::utils::phone::mask_phone_number;

use crate::services::timer::{CountdownTimer, TaskId, TaskScheduler, TimerTick};

use super::session::{ContactInfo, VerificationPhase, VerificationSession};
use super::state_machine::{VerificationAction, VerificationEvent, VerificationStateMachine};
use super::traits::Collaborators;
use super::types::{ConfirmationMessage, VerificationOutcome};

/// Drives one code-entry screen
pub struct VerificationController {
    session: VerificationSession,
    entry_timer: CountdownTimer,
    resend_timer: CountdownTimer,
    pending_verification: Option<TaskId>,
    verify_latency: Duration,
    collaborators: Collaborators,
}

impl VerificationController {
    /// Open a session, start both countdowns and deliver the code
    pub fn open(
        contact: ContactInfo,
        config: &VerificationConfig,
        verify_latency: Duration,
        collaborators: Collaborators,
        scheduler: &mut dyn TaskScheduler,
    ) -> Self {
        let session = VerificationSession::new(contact, config);
        let mut controller = Self {
            session,
            entry_timer: CountdownTimer::new(),
            resend_timer: CountdownTimer::new(),
            pending_verification: None,
            verify_latency,
            collaborators,
        };

        controller
            .entry_timer
            .start(config.entry_window_seconds, scheduler);
        controller
            .resend_timer
            .start(config.resend_window_seconds, scheduler);

        info!(
            session_id = %controller.session.id(),
            phone = %mask_phone_number(&controller.session.contact().phone_number),
            entry_window_seconds = config.entry_window_seconds,
            resend_window_seconds = config.resend_window_seconds,
            event = "verification_session_opened",
            "Verification session opened"
        );

        let phone = controller.session.contact().phone_number.clone();
        controller.deliver_code(&phone, &config.expected_code);
        controller
    }

    pub fn session(&self) -> &VerificationSession {
        &self.session
    }

    pub fn phase(&self) -> VerificationPhase {
        self.session.phase()
    }

    pub fn entry_window_remaining(&self) -> u32 {
        self.entry_timer.remaining()
    }

    pub fn resend_window_remaining(&self) -> u32 {
        self.resend_timer.remaining()
    }

    pub fn is_verifying(&self) -> bool {
        self.pending_verification.is_some()
    }

    /// Replace the input field's content
    pub fn input(&mut self, text: &str, scheduler: &mut dyn TaskScheduler) -> VerificationOutcome {
        self.dispatch(
            VerificationEvent::InputChanged {
                text: text.to_string(),
            },
            scheduler,
        )
    }

    /// Append typed digits to the current entry
    pub fn push_digits(
        &mut self,
        digits: &str,
        scheduler: &mut dyn TaskScheduler,
    ) -> VerificationOutcome {
        let text = format!("{}{}", self.session.entered_code(), digits);
        self.input(&text, scheduler)
    }

    pub fn request_resend(&mut self, scheduler: &mut dyn TaskScheduler) -> VerificationOutcome {
        self.dispatch(VerificationEvent::ResendRequested, scheduler)
    }

    /// Whether a fired task belongs to this controller
    pub fn owns_task(&self, id: TaskId) -> bool {
        self.pending_verification == Some(id)
            || self.entry_timer.owns(id)
            || self.resend_timer.owns(id)
    }

    /// Handle a scheduler wake-up. Returns `None` for tasks this controller
    /// does not own (including stale ones).
    pub fn handle_wakeup(
        &mut self,
        id: TaskId,
        scheduler: &mut dyn TaskScheduler,
    ) -> Option<VerificationOutcome> {
        if self.pending_verification == Some(id) {
            self.pending_verification = None;
            return Some(self.dispatch(VerificationEvent::VerificationSettled, scheduler));
        }

        let event = match self.entry_timer.on_tick(id, scheduler) {
            TimerTick::Ticked { remaining } => Some(VerificationEvent::EntryWindowTicked { remaining }),
            TimerTick::Expired => Some(VerificationEvent::EntryWindowExpired),
            TimerTick::Ignored => match self.resend_timer.on_tick(id, scheduler) {
                TimerTick::Ticked { remaining } => {
                    Some(VerificationEvent::ResendWindowTicked { remaining })
                }
                TimerTick::Expired => Some(VerificationEvent::ResendWindowExpired),
                TimerTick::Ignored => None,
            },
        }?;

        Some(self.dispatch(event, scheduler))
    }

    /// Tear down: cancel both countdowns and any pending check
    pub fn close(mut self, scheduler: &mut dyn TaskScheduler) {
        self.dispatch(VerificationEvent::Leave, scheduler);
        debug!(
            session_id = %self.session.id(),
            phase = ?self.session.phase(),
            event = "verification_session_closed",
            "Verification session closed"
        );
    }

    fn dispatch(
        &mut self,
        event: VerificationEvent,
        scheduler: &mut dyn TaskScheduler,
    ) -> VerificationOutcome {
        let before = self.session.phase();
        let (next, actions) = VerificationStateMachine::transition(self.session.clone(), event);
        self.session = next;

        if before != self.session.phase() {
            debug!(
                session_id = %self.session.id(),
                from = ?before,
                to = ?self.session.phase(),
                "Verification phase changed"
            );
        }

        let mut outcome = VerificationOutcome::snapshot(&self.session);
        for action in actions {
            self.execute(action, scheduler, &mut outcome);
        }
        outcome
    }

    fn execute(
        &mut self,
        action: VerificationAction,
        scheduler: &mut dyn TaskScheduler,
        outcome: &mut VerificationOutcome,
    ) {
        match action {
            VerificationAction::BeginVerification => {
                if let Some(previous) = self.pending_verification.take() {
                    scheduler.cancel(previous);
                }
                self.pending_verification = Some(scheduler.schedule_once(self.verify_latency));
            }
            VerificationAction::CancelPendingVerification => {
                if let Some(pending) = self.pending_verification.take() {
                    scheduler.cancel(pending);
                }
            }
            VerificationAction::CancelEntryTimer => self.entry_timer.cancel(scheduler),
            VerificationAction::CancelTimers => {
                self.entry_timer.cancel(scheduler);
                self.resend_timer.cancel(scheduler);
            }
            VerificationAction::RestartTimers {
                entry_seconds,
                resend_seconds,
            } => {
                self.entry_timer.restart(entry_seconds, scheduler);
                self.resend_timer.restart(resend_seconds, scheduler);
            }
            VerificationAction::DeliverCode { phone_number, code } => {
                self.deliver_code(&phone_number, &code);
            }
            VerificationAction::Feedback(signal) => self.collaborators.haptics.signal(signal),
            VerificationAction::SendConfirmation { contact } => self.send_confirmation(&contact),
            VerificationAction::Report(error) => {
                if error.is_advisory() {
                    debug!(session_id = %self.session.id(), error = %error, "Verification advisory");
                } else {
                    warn!(
                        session_id = %self.session.id(),
                        attempts = self.session.attempt_count(),
                        error = %error,
                        event = "verification_rejected",
                        "Verification rejected"
                    );
                }
                outcome.error = Some(error);
            }
            VerificationAction::Completed { contact } => {
                info!(
                    session_id = %self.session.id(),
                    phone = %mask_phone_number(&contact.phone_number),
                    event = "verification_succeeded",
                    "Phone number verified"
                );
                outcome.completed = Some(contact);
            }
        }
    }

    fn deliver_code(&self, phone: &str, code: &str) {
        match self.collaborators.delivery.deliver_code(phone, code) {
            Ok(message_id) => info!(
                session_id = %self.session.id(),
                phone = %mask_phone_number(phone),
                message_id = %message_id,
                event = "code_delivered",
                "Verification code delivered"
            ),
            Err(e) => warn!(
                session_id = %self.session.id(),
                phone = %mask_phone_number(phone),
                error = %e,
                event = "code_delivery_failed",
                "Verification code delivery failed"
            ),
        }
    }

    fn send_confirmation(&self, contact: &ContactInfo) {
        let Some(email) = contact.email.as_deref() else {
            warn!(
                session_id = %self.session.id(),
                "No e-mail address on record, confirmation skipped"
            );
            return;
        };

        let message = ConfirmationMessage::welcome(email);
        if let Err(e) = self.collaborators.notifier.send_confirmation(&message) {
            warn!(
                session_id = %self.session.id(),
                error = %e,
                event = "confirmation_failed",
                "Confirmation e-mail failed"
            );
        }
    }
}

impl std::fmt::Debug for VerificationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationController")
            .field("session", &self.session)
            .field("entry_timer", &self.entry_timer)
            .field("resend_timer", &self.resend_timer)
            .field("pending_verification", &self.pending_verification)
            .finish()
    }
}
