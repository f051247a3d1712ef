//! SMS Service Module
//!
//! Verification code delivery. Only a mock provider exists: the code is
//! printed to the console and logged with a masked number.

pub mod mock_sms;

pub use mock_sms::{MockSmsService, VERIFICATION_MESSAGE_PREFIX};
