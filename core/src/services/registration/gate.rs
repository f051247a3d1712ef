//! Per-step forward-navigation checks

use crate::domain::entities::navigation::Step;
use crate::domain::entities::registration::RegistrationRecord;
use crate::errors::{FlowError, FlowResult, ValidationError};

/// Record fields a step must have filled in before "Continue" is enabled
pub fn required_fields(step: Step) -> &'static [&'static str] {
    match step {
        Step::Signup => &[],
        Step::NameEmail => &["first_name", "last_name", "email", "postcode"],
        Step::GenderAge => &["gender", "age_band"],
        Step::Phone => &["phone_number"],
        Step::VerifyCode => &[],
        Step::Finalize => &[
            "first_name",
            "last_name",
            "email",
            "postcode",
            "gender",
            "age_band",
            "phone_number",
        ],
    }
}

/// Validation errors that block leaving `step`
pub fn step_errors(step: Step, record: &RegistrationRecord) -> Vec<ValidationError> {
    let required = required_fields(step);
    let mut errors: Vec<ValidationError> = record
        .validation_errors()
        .into_iter()
        .filter(|error| required.contains(&error.field()))
        .collect();

    if matches!(step, Step::VerifyCode | Step::Finalize) && !record.phone_verified {
        errors.push(ValidationError::PhoneNotVerified);
    }
    errors
}

pub fn can_advance(step: Step, record: &RegistrationRecord) -> bool {
    step_errors(step, record).is_empty()
}

pub fn check_step(step: Step, record: &RegistrationRecord) -> FlowResult<()> {
    let errors = step_errors(step, record);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(FlowError::Validation { step, errors })
    }
}
