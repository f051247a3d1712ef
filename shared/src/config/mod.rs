//! Configuration module with flow-specific sub-modules
//!
//! - `environment` - Environment detection and logging configuration
//! - `latency` - Simulated backend delays
//! - `verification` - OTP code, attempt limit and timer windows

pub mod environment;
pub mod latency;
pub mod verification;

use serde::{Deserialize, Serialize};

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use latency::LatencyConfig;
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// OTP verification configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Simulated latency configuration
    #[serde(default)]
    pub latency: LatencyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            latency: LatencyConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Configuration for automated tests: no simulated latency
    pub fn testing() -> Self {
        Self {
            environment: Environment::Staging,
            verification: VerificationConfig::default(),
            latency: LatencyConfig::immediate(),
            logging: LoggingConfig::for_environment(Environment::Staging),
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            verification: VerificationConfig::from_env(),
            latency: LatencyConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}
