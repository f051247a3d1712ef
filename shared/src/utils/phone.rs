//! Phone number utilities for the UK-only registration flow

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest phone number the input accepts
pub const MAX_PHONE_DIGITS: usize = 11;

/// Shortest phone number a code can be sent to
pub const MIN_PHONE_DIGITS: usize = 10;

/// Dialling prefix shown in front of national numbers
pub const UK_DIALLING_CODE: &str = "+44";

// National UK number, 10 or 11 digits
static UK_NATIONAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10,11}$").unwrap()
});

static NON_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9]").unwrap()
});

/// Strip every non-digit character
pub fn digits_only(input: &str) -> String {
    NON_DIGIT_REGEX.replace_all(input, "").into_owned()
}

/// Apply a keystroke to the phone field.
///
/// The cleaned input replaces the current value only while it fits in
/// [`MAX_PHONE_DIGITS`]; longer input leaves the field unchanged.
pub fn accept_phone_input(current: &str, input: &str) -> String {
    let cleaned = digits_only(input);
    if cleaned.len() <= MAX_PHONE_DIGITS {
        cleaned
    } else {
        current.to_string()
    }
}

/// Check if a code can be sent to this number
pub fn is_sendable_phone_number(phone: &str) -> bool {
    UK_NATIONAL_REGEX.is_match(phone)
}

/// Format a national number for display, e.g. `+44 7123456789`
pub fn format_uk_display(phone: &str) -> String {
    format!("{} {}", UK_DIALLING_CODE, phone)
}

/// Mask a phone number for logs (e.g., 071****6789)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = digits_only(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
