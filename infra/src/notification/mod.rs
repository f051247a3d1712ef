//! Confirmation e-mail delivery

pub mod mock_email;

pub use mock_email::MockEmailService;
