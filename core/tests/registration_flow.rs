//! Integration tests for the registration wizard on a virtual clock

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use citi_core::domain::{AgeBand, Gender, RecordField, Step};
    use citi_core::errors::{FlowError, VerificationError};
    use citi_core::services::{
        CodeDeliveryTrait, Collaborators, ConfirmationMessage, FeedbackSignal, FlowEvent,
        HapticFeedbackTrait, NotificationServiceTrait, RegistrationFlow, VerificationPhase,
        VirtualScheduler,
    };
    use citi_shared::config::AppConfig;

    // Mock SMS delivery
    #[derive(Default)]
    struct MockSms {
        codes: Mutex<Vec<String>>,
    }

    impl CodeDeliveryTrait for MockSms {
        fn deliver_code(&self, _phone: &str, code: &str) -> Result<String, String> {
            self.codes.lock().unwrap().push(code.to_string());
            Ok(format!("msg_id_{}", self.codes.lock().unwrap().len()))
        }
    }

    // Mock e-mail service
    #[derive(Default)]
    struct MockMail {
        sent: Mutex<Vec<ConfirmationMessage>>,
    }

    impl NotificationServiceTrait for MockMail {
        fn send_confirmation(&self, message: &ConfirmationMessage) -> Result<String, String> {
            self.sent.lock().unwrap().push(message.clone());
            Ok("mail_id".to_string())
        }
    }

    struct NoHaptics;

    impl HapticFeedbackTrait for NoHaptics {
        fn signal(&self, _signal: FeedbackSignal) {}
    }

    struct Harness {
        flow: RegistrationFlow,
        scheduler: VirtualScheduler,
        sms: Arc<MockSms>,
        mail: Arc<MockMail>,
    }

    impl Harness {
        fn new() -> Self {
            let sms = Arc::new(MockSms::default());
            let mail = Arc::new(MockMail::default());
            let collaborators = Collaborators::new(sms.clone(), mail.clone(), Arc::new(NoHaptics));
            Self {
                flow: RegistrationFlow::new(&AppConfig::default(), collaborators),
                scheduler: VirtualScheduler::new(),
                sms,
                mail,
            }
        }

        fn advance(&mut self, by: Duration) -> Vec<FlowEvent> {
            let flow = &mut self.flow;
            let mut events = Vec::new();
            self.scheduler.run_for(by, |s, id| {
                if let Some(event) = flow.handle_wakeup(id, s) {
                    events.push(event);
                }
            });
            events
        }

        fn submit(&mut self, code: &str) -> FlowEvent {
            self.flow
                .input_code(code, &mut self.scheduler)
                .expect("session open");
            self.advance(Duration::from_millis(1500))
                .into_iter()
                .rev()
                .find(|event| {
                    matches!(event, FlowEvent::Verification(outcome)
                        if outcome.phase != VerificationPhase::Submitting)
                })
                .expect("verification settled")
        }

        fn reach_verify_code(&mut self) {
            let scheduler = &mut self.scheduler;
            let flow = &mut self.flow;

            flow.continue_from_current(scheduler).unwrap();
            flow.update_field(RecordField::FirstName("Ada".into())).unwrap();
            flow.update_field(RecordField::LastName("Lovelace".into())).unwrap();
            flow.update_field(RecordField::Email("ada@example.com".into())).unwrap();
            flow.update_field(RecordField::Postcode("SW1A 1AA".into())).unwrap();
            flow.continue_from_current(scheduler).unwrap();
            flow.update_field(RecordField::Gender(Gender::SelfDescribe("Agender".into()))).unwrap();
            flow.update_field(RecordField::AgeBand(AgeBand::From25To29)).unwrap();
            flow.continue_from_current(scheduler).unwrap();
            flow.update_field(RecordField::PhoneNumber("07123 456 789".into())).unwrap();
            flow.continue_from_current(scheduler).unwrap();

            let events = self.advance(Duration::from_millis(1500));
            assert_eq!(
                events,
                vec![FlowEvent::CodeSent {
                    phone_number: "07123456789".into()
                }]
            );
            assert_eq!(self.flow.current_step(), Step::VerifyCode);
        }

        fn phase(&self) -> Option<VerificationPhase> {
            self.flow.verification().map(|v| v.phase())
        }
    }

    fn outcome(event: FlowEvent) -> citi_core::services::VerificationOutcome {
        match event {
            FlowEvent::Verification(outcome) => outcome,
            other => panic!("expected verification outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_signup_redirects_home() {
        let mut h = Harness::new();
        h.reach_verify_code();
        assert_eq!(h.sms.codes.lock().unwrap().as_slice(), &["123456".to_string()]);

        let result = outcome(h.submit("123456"));
        assert!(result.is_success());
        assert_eq!(h.flow.current_step(), Step::Finalize);
        assert!(h.flow.record().phone_verified);
        assert!(h.flow.verification().is_none());
        assert!(h.flow.can_continue());

        let mail = h.mail.sent.lock().unwrap().clone();
        assert_eq!(mail.len(), 1);
        assert_eq!(mail[0].to, "ada@example.com");

        assert_eq!(
            h.flow.continue_from_current(&mut h.scheduler),
            Ok(FlowEvent::CreatingAccount)
        );
        assert_eq!(h.advance(Duration::from_secs(2)), vec![FlowEvent::AccountCreated]);
        assert_eq!(h.flow.record().first_name, "");

        assert_eq!(h.advance(Duration::from_secs(2)), vec![FlowEvent::RedirectHome]);
        assert_eq!(h.flow.current_step(), Step::Signup);
        assert!(h.flow.store().history().is_empty());
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_three_wrong_codes_lock_the_session() {
        let mut h = Harness::new();
        h.reach_verify_code();

        let first = outcome(h.submit("111111"));
        assert_eq!((first.phase, first.attempts), (VerificationPhase::Entering, 1));
        let second = outcome(h.submit("111111"));
        assert_eq!((second.phase, second.attempts), (VerificationPhase::Entering, 2));
        let third = outcome(h.submit("111111"));
        assert_eq!((third.phase, third.attempts), (VerificationPhase::LockedOut, 3));

        h.flow.input_code("123456", &mut h.scheduler).unwrap();
        assert_eq!(h.phase(), Some(VerificationPhase::LockedOut));
        assert_eq!(h.flow.current_step(), Step::VerifyCode);
    }

    #[test]
    fn test_resend_only_after_window_elapses() {
        let mut h = Harness::new();
        h.reach_verify_code();

        let rejected = h.flow.resend_code(&mut h.scheduler).unwrap();
        assert_eq!(
            rejected.error,
            Some(VerificationError::ResendUnavailable {
                retry_in_seconds: 300
            })
        );

        h.advance(Duration::from_secs(300));
        assert_eq!(h.phase(), Some(VerificationPhase::Expired));

        let accepted = h.flow.resend_code(&mut h.scheduler).unwrap();
        assert_eq!(accepted.phase, VerificationPhase::Entering);
        assert_eq!(accepted.error, None);
        let controller = h.flow.verification().expect("session open");
        assert_eq!(controller.entry_window_remaining(), 30);
        assert_eq!(controller.resend_window_remaining(), 300);
        assert_eq!(h.sms.codes.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_back_navigation_edges() {
        let mut h = Harness::new();
        assert!(!h.flow.go_back(&mut h.scheduler));
        assert_eq!(h.flow.current_step(), Step::Signup);

        h.reach_verify_code();
        assert!(h.flow.go_back(&mut h.scheduler));
        assert_eq!(h.flow.current_step(), Step::Phone);
        assert!(h.flow.verification().is_none());
        assert_eq!(h.scheduler.pending(), 0);
        assert!(h.flow.store().params().is_empty());
    }

    #[test]
    fn test_back_after_account_created_still_lands_on_signup() {
        let mut h = Harness::new();
        h.reach_verify_code();
        assert!(outcome(h.submit("123456")).is_success());

        h.flow.create_account(&mut h.scheduler).unwrap();
        assert_eq!(h.advance(Duration::from_secs(2)), vec![FlowEvent::AccountCreated]);

        assert!(h.flow.go_back(&mut h.scheduler));
        assert!(h.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(h.flow.current_step(), Step::Signup);
        assert!(h.flow.store().history().is_empty());
        assert_eq!(h.flow.record().first_name, "");
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_changing_phone_mid_verification_is_rejected() {
        let mut h = Harness::new();
        h.reach_verify_code();

        assert_eq!(
            h.flow
                .update_field(RecordField::PhoneNumber("07999999999".into())),
            Err(FlowError::PhoneNumberLocked)
        );
        assert!(outcome(h.submit("123456")).is_success());
        assert_eq!(h.flow.current_step(), Step::Finalize);
        assert_eq!(h.flow.record().phone_number, "07123456789");
        assert_eq!(h.mail.sent.lock().unwrap().len(), 1);
    }
}
