//! Verification state machine.
//!
//! Pure transition function for the code-entry flow. Timers, the simulated
//! verification delay and collaborator calls are described by the returned
//! actions and executed by the controller.

use crate::errors::VerificationError;

use super::session::{sanitize_code, ContactInfo, VerificationPhase, VerificationSession};
use super::types::FeedbackSignal;

/// Events that drive the code-entry flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    /// The input field now holds `text`
    InputChanged { text: String },
    /// The simulated verification delay elapsed
    VerificationSettled,
    EntryWindowTicked { remaining: u32 },
    EntryWindowExpired,
    ResendWindowTicked { remaining: u32 },
    ResendWindowExpired,
    /// User pressed "Resend Code"
    ResendRequested,
    /// The screen is going away
    Leave,
}

/// Side-effects produced by state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationAction {
    /// Schedule the simulated check of the entered code
    BeginVerification,
    CancelPendingVerification,
    CancelEntryTimer,
    CancelTimers,
    RestartTimers { entry_seconds: u32, resend_seconds: u32 },
    DeliverCode { phone_number: String, code: String },
    Feedback(FeedbackSignal),
    SendConfirmation { contact: ContactInfo },
    Report(VerificationError),
    /// Terminal success, consumed by the UI layer to advance navigation
    Completed { contact: ContactInfo },
}

/// Pure verification state machine
pub struct VerificationStateMachine;

impl VerificationStateMachine {
    pub fn transition(
        mut session: VerificationSession,
        event: VerificationEvent,
    ) -> (VerificationSession, Vec<VerificationAction>) {
        use VerificationPhase::*;

        match (session.phase, event) {
            (Entering | Expired, VerificationEvent::InputChanged { text }) => {
                let code = sanitize_code(&text, session.code_length);
                if code.len() < session.code_length {
                    session.entered_code = code;
                    return (session, Vec::new());
                }
                if session.phase == Expired && session.resend_window_remaining == 0 {
                    session.entered_code.clear();
                    return (
                        session,
                        vec![VerificationAction::Report(VerificationError::CodeStale)],
                    );
                }
                session.entered_code = code;
                session.phase = Submitting;
                (session, vec![VerificationAction::BeginVerification])
            }
            (Submitting, VerificationEvent::VerificationSettled) => Self::settle(session),
            (Success, _) => (session, Vec::new()),
            (_, VerificationEvent::EntryWindowTicked { remaining }) => {
                session.entry_window_remaining = session.entry_window_remaining.min(remaining);
                (session, Vec::new())
            }
            (Entering, VerificationEvent::EntryWindowExpired) => {
                session.entry_window_remaining = 0;
                session.phase = Expired;
                (
                    session,
                    vec![VerificationAction::Report(
                        VerificationError::EntryWindowExpired,
                    )],
                )
            }
            // A submission in flight settles into `Expired` on mismatch
            (_, VerificationEvent::EntryWindowExpired) => {
                session.entry_window_remaining = 0;
                (session, Vec::new())
            }
            (_, VerificationEvent::ResendWindowTicked { remaining }) => {
                session.resend_window_remaining = session.resend_window_remaining.min(remaining);
                (session, Vec::new())
            }
            (_, VerificationEvent::ResendWindowExpired) => {
                session.resend_window_remaining = 0;
                (session, Vec::new())
            }
            (_, VerificationEvent::ResendRequested) => Self::resend(session),
            (_, VerificationEvent::Leave) => (
                session,
                vec![
                    VerificationAction::CancelTimers,
                    VerificationAction::CancelPendingVerification,
                ],
            ),
            _ => (session, Vec::new()),
        }
    }

    fn settle(mut session: VerificationSession) -> (VerificationSession, Vec<VerificationAction>) {
        if session.entered_code == session.expected_code {
            session.phase = VerificationPhase::Success;
            session.entered_code.clear();
            session.attempts.reset();
            let contact = session.contact.clone();
            return (
                session,
                vec![
                    VerificationAction::CancelTimers,
                    VerificationAction::Feedback(FeedbackSignal::SuccessNotification),
                    VerificationAction::SendConfirmation {
                        contact: contact.clone(),
                    },
                    VerificationAction::Completed { contact },
                ],
            );
        }

        session.entered_code.clear();
        let attempts = session.attempts.record_failure();
        let mut actions = vec![VerificationAction::Feedback(
            FeedbackSignal::ErrorNotification,
        )];

        if session.attempts.is_locked_out() {
            session.phase = VerificationPhase::LockedOut;
            actions.push(VerificationAction::CancelEntryTimer);
            actions.push(VerificationAction::Report(VerificationError::LockedOut {
                attempts,
            }));
        } else {
            session.phase = session.idle_phase();
            actions.push(VerificationAction::Report(VerificationError::Mismatch {
                remaining_attempts: session.attempts.remaining(),
            }));
        }
        (session, actions)
    }

    fn resend(mut session: VerificationSession) -> (VerificationSession, Vec<VerificationAction>) {
        if session.resend_window_remaining > 0 {
            let retry_in_seconds = session.resend_window_remaining;
            return (
                session,
                vec![VerificationAction::Report(
                    VerificationError::ResendUnavailable { retry_in_seconds },
                )],
            );
        }

        session.entered_code.clear();
        session.attempts.reset();
        session.entry_window_remaining = session.entry_window_seconds;
        session.resend_window_remaining = session.resend_window_seconds;
        session.phase = VerificationPhase::Entering;

        let actions = vec![
            VerificationAction::CancelPendingVerification,
            VerificationAction::RestartTimers {
                entry_seconds: session.entry_window_seconds,
                resend_seconds: session.resend_window_seconds,
            },
            VerificationAction::DeliverCode {
                phone_number: session.contact.phone_number.clone(),
                code: session.expected_code.clone(),
            },
        ];
        (session, actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citi_shared::config::VerificationConfig;

    fn fresh() -> VerificationSession {
        VerificationSession::new(
            ContactInfo::new("07123456789", Some("ada@example.com".into())),
            &VerificationConfig::default(),
        )
    }

    fn submit(session: VerificationSession, code: &str) -> (VerificationSession, Vec<VerificationAction>) {
        let (session, actions) = VerificationStateMachine::transition(
            session,
            VerificationEvent::InputChanged { text: code.into() },
        );
        assert_eq!(actions, vec![VerificationAction::BeginVerification]);
        assert_eq!(session.phase(), VerificationPhase::Submitting);
        VerificationStateMachine::transition(session, VerificationEvent::VerificationSettled)
    }

    #[test]
    fn test_partial_input_stays_entering() {
        let (session, actions) = VerificationStateMachine::transition(
            fresh(),
            VerificationEvent::InputChanged { text: "12a3".into() },
        );
        assert_eq!(session.phase(), VerificationPhase::Entering);
        assert_eq!(session.entered_code(), "123");
        assert!(actions.is_empty());
    }

    #[test]
    fn test_correct_code_succeeds() {
        let (session, actions) = submit(fresh(), "123456");
        assert_eq!(session.phase(), VerificationPhase::Success);
        assert_eq!(session.entered_code(), "");
        assert_eq!(session.attempt_count(), 0);
        assert_eq!(actions[0], VerificationAction::CancelTimers);
        assert!(actions.contains(&VerificationAction::Feedback(
            FeedbackSignal::SuccessNotification
        )));
        assert!(matches!(
            actions.last(),
            Some(VerificationAction::Completed { contact }) if contact.phone_number == "07123456789"
        ));
    }

    #[test]
    fn test_three_wrong_codes_lock_out() {
        let (session, actions) = submit(fresh(), "111111");
        assert_eq!(session.phase(), VerificationPhase::Entering);
        assert_eq!(session.attempt_count(), 1);
        assert!(actions.contains(&VerificationAction::Report(VerificationError::Mismatch {
            remaining_attempts: 2
        })));

        let (session, _) = submit(session, "111111");
        assert_eq!(session.phase(), VerificationPhase::Entering);
        assert_eq!(session.attempt_count(), 2);

        let (session, actions) = submit(session, "111111");
        assert_eq!(session.phase(), VerificationPhase::LockedOut);
        assert_eq!(session.attempt_count(), 3);
        assert!(session.is_locked());
        assert!(actions.contains(&VerificationAction::CancelEntryTimer));
        assert!(actions.contains(&VerificationAction::Report(VerificationError::LockedOut {
            attempts: 3
        })));
    }

    #[test]
    fn test_locked_out_ignores_input() {
        let mut session = fresh();
        for _ in 0..3 {
            session = submit(session, "000000").0;
        }
        let (session, actions) = VerificationStateMachine::transition(
            session,
            VerificationEvent::InputChanged { text: "123456".into() },
        );
        assert_eq!(session.phase(), VerificationPhase::LockedOut);
        assert_eq!(session.entered_code(), "");
        assert!(actions.is_empty());
    }

    #[test]
    fn test_input_ignored_while_submitting() {
        let (session, _) = VerificationStateMachine::transition(
            fresh(),
            VerificationEvent::InputChanged { text: "123456".into() },
        );
        let (session, actions) = VerificationStateMachine::transition(
            session,
            VerificationEvent::InputChanged { text: "9".into() },
        );
        assert_eq!(session.phase(), VerificationPhase::Submitting);
        assert_eq!(session.entered_code(), "123456");
        assert!(actions.is_empty());
    }

    #[test]
    fn test_entry_expiry_is_lenient() {
        let (session, actions) =
            VerificationStateMachine::transition(fresh(), VerificationEvent::EntryWindowExpired);
        assert_eq!(session.phase(), VerificationPhase::Expired);
        assert_eq!(
            actions,
            vec![VerificationAction::Report(VerificationError::EntryWindowExpired)]
        );

        let (session, _) = submit(session, "123456");
        assert_eq!(session.phase(), VerificationPhase::Success);
    }

    #[test]
    fn test_mismatch_after_expiry_returns_to_expired() {
        let (session, _) =
            VerificationStateMachine::transition(fresh(), VerificationEvent::EntryWindowExpired);
        let (session, _) = submit(session, "999999");
        assert_eq!(session.phase(), VerificationPhase::Expired);
        assert_eq!(session.attempt_count(), 1);
    }

    #[test]
    fn test_expiry_during_submission_settles_into_expired() {
        let (session, _) = VerificationStateMachine::transition(
            fresh(),
            VerificationEvent::InputChanged { text: "999999".into() },
        );
        let (session, actions) =
            VerificationStateMachine::transition(session, VerificationEvent::EntryWindowExpired);
        assert_eq!(session.phase(), VerificationPhase::Submitting);
        assert!(actions.is_empty());

        let (session, _) =
            VerificationStateMachine::transition(session, VerificationEvent::VerificationSettled);
        assert_eq!(session.phase(), VerificationPhase::Expired);
    }

    #[test]
    fn test_full_code_rejected_once_both_windows_elapsed() {
        let (session, _) =
            VerificationStateMachine::transition(fresh(), VerificationEvent::EntryWindowExpired);
        let (session, _) =
            VerificationStateMachine::transition(session, VerificationEvent::ResendWindowExpired);

        let (session, actions) = VerificationStateMachine::transition(
            session,
            VerificationEvent::InputChanged { text: "123456".into() },
        );
        assert_eq!(session.phase(), VerificationPhase::Expired);
        assert_eq!(session.entered_code(), "");
        assert_eq!(session.attempt_count(), 0);
        assert_eq!(
            actions,
            vec![VerificationAction::Report(VerificationError::CodeStale)]
        );
    }

    #[test]
    fn test_resend_rejected_while_window_open() {
        let before = fresh();
        let (after, actions) =
            VerificationStateMachine::transition(before.clone(), VerificationEvent::ResendRequested);
        assert_eq!(after, before);
        assert_eq!(
            actions,
            vec![VerificationAction::Report(VerificationError::ResendUnavailable {
                retry_in_seconds: 300
            })]
        );
    }

    #[test]
    fn test_resend_after_lockout_resets_session() {
        let mut session = fresh();
        for _ in 0..3 {
            session = submit(session, "000000").0;
        }
        let (session, _) =
            VerificationStateMachine::transition(session, VerificationEvent::ResendWindowExpired);

        let (session, actions) =
            VerificationStateMachine::transition(session, VerificationEvent::ResendRequested);
        assert_eq!(session.phase(), VerificationPhase::Entering);
        assert_eq!(session.attempt_count(), 0);
        assert_eq!(session.entry_window_remaining(), 30);
        assert_eq!(session.resend_window_remaining(), 300);
        assert!(actions.contains(&VerificationAction::RestartTimers {
            entry_seconds: 30,
            resend_seconds: 300
        }));
        assert!(actions.contains(&VerificationAction::DeliverCode {
            phone_number: "07123456789".into(),
            code: "123456".into()
        }));
    }

    #[test]
    fn test_success_ignores_ticks_and_resend() {
        let (session, _) = submit(fresh(), "123456");
        let frozen = session.clone();

        let (session, actions) = VerificationStateMachine::transition(
            session,
            VerificationEvent::EntryWindowTicked { remaining: 3 },
        );
        assert!(actions.is_empty());
        let (session, actions) =
            VerificationStateMachine::transition(session, VerificationEvent::ResendWindowExpired);
        assert!(actions.is_empty());
        let (session, actions) =
            VerificationStateMachine::transition(session, VerificationEvent::ResendRequested);
        assert!(actions.is_empty());
        assert_eq!(session, frozen);
    }

    #[test]
    fn test_ticks_never_increase_remaining() {
        let (session, _) = VerificationStateMachine::transition(
            fresh(),
            VerificationEvent::EntryWindowTicked { remaining: 10 },
        );
        let (session, _) = VerificationStateMachine::transition(
            session,
            VerificationEvent::EntryWindowTicked { remaining: 20 },
        );
        assert_eq!(session.entry_window_remaining(), 10);
    }

    #[test]
    fn test_leave_cancels_everything() {
        let (session, actions) =
            VerificationStateMachine::transition(fresh(), VerificationEvent::Leave);
        assert_eq!(session.phase(), VerificationPhase::Entering);
        assert_eq!(
            actions,
            vec![
                VerificationAction::CancelTimers,
                VerificationAction::CancelPendingVerification
            ]
        );
    }
}
