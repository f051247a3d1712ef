use std::time::Duration;

use citi_shared::config::VerificationConfig;

use super::mocks::Recorders;
use crate::errors::VerificationError;
use crate::services::timer::{TaskId, TaskScheduler, VirtualScheduler};
use crate::services::verification::{
    ContactInfo, FeedbackSignal, VerificationController, VerificationOutcome, VerificationPhase,
};

const VERIFY_LATENCY: Duration = Duration::from_millis(1500);

fn contact() -> ContactInfo {
    ContactInfo::new("07123456789", Some("ada@example.com".to_string()))
}

fn open(
    config: &VerificationConfig,
    recorders: &Recorders,
    scheduler: &mut VirtualScheduler,
) -> VerificationController {
    VerificationController::open(
        contact(),
        config,
        VERIFY_LATENCY,
        recorders.collaborators(),
        scheduler,
    )
}

fn advance(
    controller: &mut VerificationController,
    scheduler: &mut VirtualScheduler,
    by: Duration,
) -> Vec<VerificationOutcome> {
    let mut outcomes = Vec::new();
    scheduler.run_for(by, |s, id| {
        if let Some(outcome) = controller.handle_wakeup(id, s) {
            outcomes.push(outcome);
        }
    });
    outcomes
}

fn submit(
    controller: &mut VerificationController,
    scheduler: &mut VirtualScheduler,
    code: &str,
) -> VerificationOutcome {
    let pending = controller.input(code, scheduler);
    assert_eq!(pending.phase, VerificationPhase::Submitting);
    advance(controller, scheduler, VERIFY_LATENCY)
        .into_iter()
        .find(|outcome| outcome.phase != VerificationPhase::Submitting)
        .expect("verification settled")
}

#[test]
fn test_open_delivers_code_and_starts_both_timers() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    assert_eq!(controller.phase(), VerificationPhase::Entering);
    assert_eq!(controller.entry_window_remaining(), 30);
    assert_eq!(controller.resend_window_remaining(), 300);
    assert_eq!(scheduler.pending(), 2);
    assert_eq!(
        recorders.delivery.sent.lock().unwrap().as_slice(),
        &[("07123456789".to_string(), "123456".to_string())]
    );
}

#[test]
fn test_correct_code_succeeds_after_latency() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    controller.push_digits("123", &mut scheduler);
    let outcome = controller.push_digits("456", &mut scheduler);
    assert_eq!(outcome.phase, VerificationPhase::Submitting);
    assert!(controller.is_verifying());

    let outcomes = advance(&mut controller, &mut scheduler, Duration::from_millis(1499));
    assert!(outcomes.iter().all(|o| o.phase == VerificationPhase::Submitting));

    let outcomes = advance(&mut controller, &mut scheduler, Duration::from_millis(1));
    let last = outcomes.last().expect("verification settled");
    assert!(last.is_success());
    assert_eq!(last.completed, Some(contact()));
    assert_eq!(last.error, None);

    assert_eq!(scheduler.pending(), 0);
    assert_eq!(controller.entry_window_remaining(), 29);
    assert_eq!(controller.resend_window_remaining(), 299);
    assert_eq!(
        recorders.haptics.signals(),
        vec![FeedbackSignal::SuccessNotification]
    );

    let mail = recorders.notifier.sent();
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].to, "ada@example.com");
    assert_eq!(mail[0].subject, "Welcome to CiTiApp");
}

#[test]
fn test_success_is_final() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);
    assert!(submit(&mut controller, &mut scheduler, "123456").is_success());

    let outcomes = advance(&mut controller, &mut scheduler, Duration::from_secs(400));
    assert!(outcomes.is_empty());

    let outcome = controller.input("654321", &mut scheduler);
    assert_eq!(outcome.phase, VerificationPhase::Success);
    assert_eq!(outcome.completed, None);
    assert_eq!(recorders.notifier.sent().len(), 1);
}

#[test]
fn test_lockout_then_resend_resets_session() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    let first = submit(&mut controller, &mut scheduler, "000000");
    assert_eq!(first.phase, VerificationPhase::Entering);
    assert_eq!(
        first.error,
        Some(VerificationError::Mismatch {
            remaining_attempts: 2
        })
    );
    submit(&mut controller, &mut scheduler, "000000");
    let third = submit(&mut controller, &mut scheduler, "000000");
    assert_eq!(third.phase, VerificationPhase::LockedOut);
    assert_eq!(third.attempts, 3);
    assert_eq!(third.error, Some(VerificationError::LockedOut { attempts: 3 }));
    assert_eq!(
        recorders.haptics.signals(),
        vec![FeedbackSignal::ErrorNotification; 3]
    );

    // Entry countdown stops at lockout; resend countdown keeps going
    let frozen = controller.entry_window_remaining();
    assert_eq!(scheduler.pending(), 1);

    let locked_input = controller.input("123456", &mut scheduler);
    assert_eq!(locked_input.phase, VerificationPhase::LockedOut);
    assert!(!controller.is_verifying());

    advance(&mut controller, &mut scheduler, Duration::from_secs(300));
    assert_eq!(controller.entry_window_remaining(), frozen);
    assert_eq!(controller.resend_window_remaining(), 0);

    let outcome = controller.request_resend(&mut scheduler);
    assert_eq!(outcome.phase, VerificationPhase::Entering);
    assert_eq!(outcome.attempts, 0);
    assert_eq!(outcome.error, None);
    assert_eq!(controller.entry_window_remaining(), 30);
    assert_eq!(controller.resend_window_remaining(), 300);
    assert_eq!(recorders.delivery.sent_count(), 2);

    assert!(submit(&mut controller, &mut scheduler, "123456").is_success());
}

#[test]
fn test_resend_rejected_while_window_open() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    advance(&mut controller, &mut scheduler, Duration::from_secs(10));
    let outcome = controller.request_resend(&mut scheduler);

    assert_eq!(
        outcome.error,
        Some(VerificationError::ResendUnavailable {
            retry_in_seconds: 290
        })
    );
    assert_eq!(controller.resend_window_remaining(), 290);
    assert_eq!(recorders.delivery.sent_count(), 1);
}

#[test]
fn test_entry_window_expiry_is_reported_once_and_lenient() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    let outcomes = advance(&mut controller, &mut scheduler, Duration::from_secs(45));
    let expiries = outcomes
        .iter()
        .filter(|o| o.error == Some(VerificationError::EntryWindowExpired))
        .count();
    assert_eq!(expiries, 1);
    assert_eq!(controller.phase(), VerificationPhase::Expired);
    assert_eq!(controller.entry_window_remaining(), 0);
    assert_eq!(controller.resend_window_remaining(), 255);

    assert!(submit(&mut controller, &mut scheduler, "123456").is_success());
}

#[test]
fn test_stale_code_rejected_after_both_windows() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let config = VerificationConfig::default().with_windows(2, 3);
    let mut controller = open(&config, &recorders, &mut scheduler);

    advance(&mut controller, &mut scheduler, Duration::from_secs(5));
    let outcome = controller.input("123456", &mut scheduler);

    assert_eq!(outcome.phase, VerificationPhase::Expired);
    assert_eq!(outcome.error, Some(VerificationError::CodeStale));
    assert_eq!(outcome.attempts, 0);
    assert_eq!(controller.session().entered_code(), "");
}

#[test]
fn test_close_cancels_timers_and_pending_check() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);
    controller.input("123456", &mut scheduler);
    assert_eq!(scheduler.pending(), 3);

    controller.close(&mut scheduler);

    assert_eq!(scheduler.pending(), 0);
    assert!(recorders.notifier.sent().is_empty());
}

#[test]
fn test_foreign_task_is_ignored() {
    let recorders = Recorders::new();
    let mut scheduler = VirtualScheduler::new();
    let mut controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    let foreign = scheduler.schedule_once(Duration::ZERO);
    assert!(!controller.owns_task(foreign));
    assert_eq!(controller.handle_wakeup(foreign, &mut scheduler), None);
    assert_eq!(controller.handle_wakeup(TaskId::new(999), &mut scheduler), None);
}

#[test]
fn test_delivery_failure_keeps_session_open() {
    let recorders = Recorders {
        delivery: std::sync::Arc::new(super::mocks::MockDelivery {
            should_fail: true,
            ..Default::default()
        }),
        ..Recorders::new()
    };
    let mut scheduler = VirtualScheduler::new();
    let controller = open(&VerificationConfig::default(), &recorders, &mut scheduler);

    assert_eq!(controller.phase(), VerificationPhase::Entering);
    assert_eq!(recorders.delivery.sent_count(), 0);
}
