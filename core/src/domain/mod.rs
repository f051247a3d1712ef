//! Domain layer containing the registration entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{
    AgeBand, Gender, NavigationParams, NavigationState, RecordField, RegistrationRecord,
    SignupMethod, Step, EMAIL_PARAM, PHONE_NUMBER_PARAM,
};
