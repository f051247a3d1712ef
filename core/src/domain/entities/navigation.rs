//! Wizard steps and the navigation position within them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter key carrying the phone number into the code-entry step
pub const PHONE_NUMBER_PARAM: &str = "phone_number";

/// Parameter key carrying the e-mail address into the code-entry step
pub const EMAIL_PARAM: &str = "email";

/// Registration wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Signup,
    NameEmail,
    GenderAge,
    Phone,
    VerifyCode,
    Finalize,
}

impl Step {
    /// Step every session starts at
    pub const INITIAL: Step = Step::Signup;

    /// All steps in wizard order
    pub const ALL: [Step; 6] = [
        Step::Signup,
        Step::NameEmail,
        Step::GenderAge,
        Step::Phone,
        Step::VerifyCode,
        Step::Finalize,
    ];

    /// The step that follows this one, `None` after `Finalize`
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Signup => Some(Step::NameEmail),
            Step::NameEmail => Some(Step::GenderAge),
            Step::GenderAge => Some(Step::Phone),
            Step::Phone => Some(Step::VerifyCode),
            Step::VerifyCode => Some(Step::Finalize),
            Step::Finalize => None,
        }
    }

    /// Progress indicator `(current, total)` shown on form steps.
    ///
    /// Phone entry and code entry share the third slot.
    pub fn progress(self) -> Option<(u8, u8)> {
        match self {
            Step::Signup => None,
            Step::NameEmail => Some((1, 4)),
            Step::GenderAge => Some((2, 4)),
            Step::Phone | Step::VerifyCode => Some((3, 4)),
            Step::Finalize => Some((4, 4)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Signup => "Signup",
            Step::NameEmail => "NameEmail",
            Step::GenderAge => "GenderAge",
            Step::Phone => "Phone",
            Step::VerifyCode => "VerifyCode",
            Step::Finalize => "Finalize",
        };
        f.write_str(name)
    }
}

/// Transient key/value payload handed to the next step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationParams(BTreeMap<String, String>);

impl NavigationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Phone number passed to the code-entry step
    pub fn phone_number(&self) -> Option<&str> {
        self.get(PHONE_NUMBER_PARAM)
    }

    /// E-mail address passed to the code-entry step
    pub fn email(&self) -> Option<&str> {
        self.get(EMAIL_PARAM)
    }
}

/// Position in the linear wizard.
///
/// `history` never contains `current_step`: navigating to a step that is
/// already in the history unwinds back to it instead of pushing a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    current_step: Step,
    history: Vec<Step>,
    params: NavigationParams,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_step: Step::INITIAL,
            history: Vec::new(),
            params: NavigationParams::new(),
        }
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn history(&self) -> &[Step] {
        &self.history
    }

    pub fn params(&self) -> &NavigationParams {
        &self.params
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub(crate) fn push(&mut self, step: Step, params: NavigationParams) {
        if step != self.current_step {
            match self.history.iter().position(|visited| *visited == step) {
                Some(index) => self.history.truncate(index),
                None => self.history.push(self.current_step),
            }
            self.current_step = step;
        }
        self.params = params;
    }

    pub(crate) fn pop(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current_step = previous;
                self.params = NavigationParams::new();
                true
            }
            None => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
