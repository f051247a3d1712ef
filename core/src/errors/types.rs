//! Error types for registration validation and OTP verification
//!
//! None of these are fatal to the application. Validation errors disable the
//! forward action of a step, verification errors become inline messages on
//! the code-entry screen.

use thiserror::Error;

/// Validation errors
///
/// A required registration field is missing or malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid length: {field} (min: {min}, max: {max}, actual: {actual})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Phone number not verified")]
    PhoneNotVerified,
}

impl ValidationError {
    /// Name of the record field this error is about
    pub fn field(&self) -> &str {
        match self {
            ValidationError::RequiredField { field } => field,
            ValidationError::InvalidEmail => "email",
            ValidationError::InvalidLength { field, .. } => field,
            ValidationError::PhoneNotVerified => "phone_verified",
        }
    }
}

/// Verification errors
///
/// Surfaced on the code-entry screen. Only `LockedOut` blocks further
/// submissions, and a resend clears it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid code. {remaining_attempts} attempt(s) remaining")]
    Mismatch { remaining_attempts: u32 },

    #[error("Too many attempts ({attempts}). Please request a new code")]
    LockedOut { attempts: u32 },

    #[error("Code entry time elapsed")]
    EntryWindowExpired,

    #[error("Verification code expired. Please request a new code")]
    CodeStale,

    #[error("Resend available in {retry_in_seconds} seconds")]
    ResendUnavailable { retry_in_seconds: u32 },
}

impl VerificationError {
    /// Advisory errors change hint text only and never block input
    pub fn is_advisory(&self) -> bool {
        matches!(self, VerificationError::EntryWindowExpired)
    }
}
