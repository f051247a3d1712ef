//! In-progress registration record and its field types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use citi_shared::utils::phone::{accept_phone_input, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
use citi_shared::utils::validation::validators;

use crate::errors::ValidationError;

/// Gender options offered by the signup form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "text")]
pub enum Gender {
    Man,
    Woman,
    NonBinary,
    PreferNotToSay,
    /// Free-text self description
    SelfDescribe(String),
}

impl Gender {
    /// Human readable label
    pub fn label(&self) -> &str {
        match self {
            Gender::Man => "Man",
            Gender::Woman => "Woman",
            Gender::NonBinary => "Non-binary",
            Gender::PreferNotToSay => "Prefer not to say",
            Gender::SelfDescribe(text) => text,
        }
    }

    /// A self-describe selection needs some text
    pub fn is_complete(&self) -> bool {
        match self {
            Gender::SelfDescribe(text) => validators::not_blank(text),
            _ => true,
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Parses option ids; `self-describe:<text>` carries the description.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(text) = s.strip_prefix("self-describe:") {
            return Ok(Gender::SelfDescribe(text.trim().to_string()));
        }
        match s.to_lowercase().as_str() {
            "man" => Ok(Gender::Man),
            "woman" => Ok(Gender::Woman),
            "non-binary" => Ok(Gender::NonBinary),
            "prefer-not-to-say" => Ok(Gender::PreferNotToSay),
            _ => Err(format!("Invalid gender option: {}", s)),
        }
    }
}

/// Age ranges offered by the signup form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    Under18,
    From18To24,
    From25To29,
    From30To34,
    From35To39,
    From40To44,
    From45To49,
    From50To54,
    From55To59,
    From60To64,
    From65To69,
    Over70,
}

impl AgeBand {
    pub const ALL: [AgeBand; 12] = [
        AgeBand::Under18,
        AgeBand::From18To24,
        AgeBand::From25To29,
        AgeBand::From30To34,
        AgeBand::From35To39,
        AgeBand::From40To44,
        AgeBand::From45To49,
        AgeBand::From50To54,
        AgeBand::From55To59,
        AgeBand::From60To64,
        AgeBand::From65To69,
        AgeBand::Over70,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under18 => "Under 18",
            AgeBand::From18To24 => "18-24",
            AgeBand::From25To29 => "25-29",
            AgeBand::From30To34 => "30-34",
            AgeBand::From35To39 => "35-39",
            AgeBand::From40To44 => "40-44",
            AgeBand::From45To49 => "45-49",
            AgeBand::From50To54 => "50-54",
            AgeBand::From55To59 => "55-59",
            AgeBand::From60To64 => "60-64",
            AgeBand::From65To69 => "65-69",
            AgeBand::Over70 => "70+",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AgeBand::ALL
            .iter()
            .copied()
            .find(|band| band.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Invalid age band: {}", s))
    }
}

/// How the user started signing up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupMethod {
    Google,
    Apple,
    RegistrationForm,
}

/// A single field update for [`RegistrationRecord::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordField {
    FirstName(String),
    LastName(String),
    Email(String),
    Postcode(String),
    Gender(Gender),
    AgeBand(AgeBand),
    /// Raw phone input; non-digits are stripped
    PhoneNumber(String),
    PhoneVerified(bool),
    SignupMethod(SignupMethod),
}

/// The user's in-progress signup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RegistrationRecord {
    #[validate(length(min = 1))]
    pub first_name: String,

    #[validate(length(min = 1))]
    pub last_name: String,

    #[validate(contains = "@")]
    pub email: String,

    #[validate(length(min = 1))]
    pub postcode: String,

    #[validate(required)]
    pub gender: Option<Gender>,

    #[validate(required)]
    pub age_band: Option<AgeBand>,

    /// Digits only, at most 11
    #[validate(length(min = 10, max = 11))]
    pub phone_number: String,

    /// Set once the OTP for `phone_number` was accepted
    pub phone_verified: bool,

    pub signup_method: Option<SignupMethod>,
}

/// Record fields in form order, used to sort validation output
const FIELD_ORDER: [&str; 7] = [
    "first_name",
    "last_name",
    "email",
    "postcode",
    "gender",
    "age_band",
    "phone_number",
];

impl RegistrationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one field into the record. No cross-field validation happens
    /// here, except that changing the phone number drops its verification.
    pub fn apply(&mut self, field: RecordField) {
        match field {
            RecordField::FirstName(value) => self.first_name = value,
            RecordField::LastName(value) => self.last_name = value,
            RecordField::Email(value) => self.email = value,
            RecordField::Postcode(value) => self.postcode = value,
            RecordField::Gender(value) => self.gender = Some(value),
            RecordField::AgeBand(value) => self.age_band = Some(value),
            RecordField::PhoneNumber(raw) => {
                let phone = accept_phone_input(&self.phone_number, &raw);
                if phone != self.phone_number {
                    self.phone_verified = false;
                }
                self.phone_number = phone;
            }
            RecordField::PhoneVerified(value) => self.phone_verified = value,
            RecordField::SignupMethod(value) => self.signup_method = Some(value),
        }
    }

    /// Every field-level problem with the record, in form order
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Err(report) = self.validate() {
            for (field, failures) in report.field_errors() {
                for failure in failures.iter() {
                    errors.push(self.describe_failure(field, failure.code.as_ref()));
                }
            }
        }

        if let Some(gender) = &self.gender {
            if !gender.is_complete() {
                errors.push(ValidationError::RequiredField {
                    field: "gender".to_string(),
                });
            }
        }

        errors.sort_by_key(|error| {
            FIELD_ORDER
                .iter()
                .position(|field| *field == error.field())
                .unwrap_or(FIELD_ORDER.len())
        });
        errors.dedup();
        errors
    }

    /// Valid for final submission: every field present and well-formed,
    /// and the phone number verified
    pub fn is_submittable(&self) -> bool {
        self.validation_errors().is_empty() && self.phone_verified
    }

    fn describe_failure(&self, field: &str, code: &str) -> ValidationError {
        match (field, code) {
            ("email", "contains") if !self.email.is_empty() => ValidationError::InvalidEmail,
            ("phone_number", "length") if !self.phone_number.is_empty() => {
                ValidationError::InvalidLength {
                    field: field.to_string(),
                    min: MIN_PHONE_DIGITS,
                    max: MAX_PHONE_DIGITS,
                    actual: self.phone_number.len(),
                }
            }
            _ => ValidationError::RequiredField {
                field: field.to_string(),
            },
        }
    }
}
