//! Services driving the registration wizard.

pub mod attempts;
pub mod registration;
pub mod timer;
pub mod verification;

// Re-export commonly used types
pub use attempts::AttemptTracker;
pub use registration::{FlowEvent, RegistrationFlow, RegistrationStore};
pub use timer::{CountdownTimer, TaskId, TaskScheduler, TimerTick, VirtualScheduler, TICK_PERIOD};
pub use verification::{
    Collaborators, CodeDeliveryTrait, ConfirmationMessage, ContactInfo, FeedbackSignal,
    HapticFeedbackTrait, NotificationServiceTrait, VerificationController, VerificationOutcome,
    VerificationPhase, VerificationSession,
};
