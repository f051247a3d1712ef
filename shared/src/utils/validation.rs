//! Common validation utilities

/// Common validation functions
pub mod validators {
    /// Check if a string has any non-whitespace content
    pub fn not_blank(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if an email address is usable by the signup form.
    ///
    /// The form only asks for an `@` separator.
    pub fn is_valid_email(email: &str) -> bool {
        email.contains('@')
    }

    /// Check if a string length is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        len >= min && len <= max
    }
}

/// Format remaining seconds as `m:ss`
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
