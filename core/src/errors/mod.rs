//! Domain-specific error types and error handling.

mod types;

pub use types::{ValidationError, VerificationError};

use thiserror::Error;

use crate::domain::entities::navigation::Step;

/// Core flow errors (general purpose)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("{step} has {} invalid field(s)", .errors.len())]
    Validation {
        step: Step,
        errors: Vec<ValidationError>,
    },

    #[error("Operation requires step {expected}, current step is {actual}")]
    InvalidStep { expected: Step, actual: Step },

    #[error("No verification session is open")]
    NoActiveSession,

    #[error("Another operation is already in progress")]
    Busy,

    #[error("Phone number cannot change while its code is being verified")]
    PhoneNumberLocked,

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

pub type FlowResult<T> = Result<T, FlowError>;
