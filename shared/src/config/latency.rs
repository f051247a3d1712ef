//! Simulated backend latency configuration
//!
//! Nothing in the flow talks to a server. These delays stand in for the
//! "sending", "verifying" and "creating account" spinners.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::verification::env_or;

/// Delays applied before simulated operations settle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LatencyConfig {
    /// Delay before a verification code counts as sent
    pub send_code_ms: u64,

    /// Delay before a submitted code is checked
    pub verify_ms: u64,

    /// Delay before the account counts as created
    pub account_creation_ms: u64,

    /// Delay between account creation and the redirect home
    pub redirect_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            send_code_ms: 1500,
            verify_ms: 1500,
            account_creation_ms: 2000,
            redirect_ms: 2000,
        }
    }
}

impl LatencyConfig {
    /// All delays zero; operations settle on the next scheduler turn
    pub fn immediate() -> Self {
        Self {
            send_code_ms: 0,
            verify_ms: 0,
            account_creation_ms: 0,
            redirect_ms: 0,
        }
    }

    /// Load overrides from `CITI_*_MS` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            send_code_ms: env_or("CITI_SEND_CODE_MS", defaults.send_code_ms),
            verify_ms: env_or("CITI_VERIFY_MS", defaults.verify_ms),
            account_creation_ms: env_or("CITI_ACCOUNT_CREATION_MS", defaults.account_creation_ms),
            redirect_ms: env_or("CITI_REDIRECT_MS", defaults.redirect_ms),
        }
    }

    pub fn send_code(&self) -> Duration {
        Duration::from_millis(self.send_code_ms)
    }

    pub fn verify(&self) -> Duration {
        Duration::from_millis(self.verify_ms)
    }

    pub fn account_creation(&self) -> Duration {
        Duration::from_millis(self.account_creation_ms)
    }

    pub fn redirect(&self) -> Duration {
        Duration::from_millis(self.redirect_ms)
    }
}
