//! OTP verification configuration

use serde::{Deserialize, Serialize};

/// Number of digits in a verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Hard-coded code accepted by the simulated verifier
pub const DEFAULT_EXPECTED_CODE: &str = "123456";

/// Failed submissions allowed before the session locks
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Seconds the code-entry window stays open
pub const DEFAULT_ENTRY_WINDOW_SECONDS: u32 = 30;

/// Seconds before a new code may be requested
pub const DEFAULT_RESEND_WINDOW_SECONDS: u32 = 300;

/// Verification session configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of digits that triggers automatic submission
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// The code every session expects
    #[serde(default = "default_expected_code")]
    pub expected_code: String,

    /// Maximum failed submissions before lockout
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Code-entry window in seconds
    #[serde(default = "default_entry_window")]
    pub entry_window_seconds: u32,

    /// Resend window in seconds
    #[serde(default = "default_resend_window")]
    pub resend_window_seconds: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            expected_code: default_expected_code(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            entry_window_seconds: DEFAULT_ENTRY_WINDOW_SECONDS,
            resend_window_seconds: DEFAULT_RESEND_WINDOW_SECONDS,
        }
    }
}

impl VerificationConfig {
    /// Load overrides from `CITI_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_length: defaults.code_length,
            expected_code: std::env::var("CITI_EXPECTED_CODE")
                .ok()
                .filter(|code| {
                    code.len() == DEFAULT_CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
                })
                .unwrap_or(defaults.expected_code),
            max_attempts: env_or("CITI_MAX_ATTEMPTS", defaults.max_attempts),
            entry_window_seconds: env_or("CITI_ENTRY_WINDOW_SECONDS", defaults.entry_window_seconds),
            resend_window_seconds: env_or(
                "CITI_RESEND_WINDOW_SECONDS",
                defaults.resend_window_seconds,
            ),
        }
    }

    /// Set the expected code
    pub fn with_expected_code(mut self, code: impl Into<String>) -> Self {
        self.expected_code = code.into();
        self
    }

    /// Set both timer windows
    pub fn with_windows(mut self, entry_seconds: u32, resend_seconds: u32) -> Self {
        self.entry_window_seconds = entry_seconds;
        self.resend_window_seconds = resend_seconds;
        self
    }
}

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_expected_code() -> String {
    String::from(DEFAULT_EXPECTED_CODE)
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_entry_window() -> u32 {
    DEFAULT_ENTRY_WINDOW_SECONDS
}

fn default_resend_window() -> u32 {
    DEFAULT_RESEND_WINDOW_SECONDS
}
