//! Domain entities for the signup wizard.

pub mod navigation;
pub mod registration;

// Re-export commonly used types
pub use navigation::{NavigationParams, NavigationState, Step, EMAIL_PARAM, PHONE_NUMBER_PARAM};
pub use registration::{AgeBand, Gender, RecordField, RegistrationRecord, SignupMethod};
