//! Domain-level constants.
//!
//! These constants define registration rules and the messages shown to users.

// =============================================================================
// Field names
// =============================================================================

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_PASSWORD1: &str = "password1";
pub const FIELD_PASSWORD2: &str = "password2";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_LAST_NAME: &str = "last_name";

// =============================================================================
// Validation
// =============================================================================

/// Characters allowed in a username
pub const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9_\-\.]*$";

/// Address with at least one dot in its domain part
pub const EMAIL_DOMAIN_PATTERN: &str = r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$";

/// Maximum email length, matching the `users.email` column
pub const MAX_EMAIL_LENGTH: u64 = 254;

/// Maximum username length (in characters)
pub const MAX_USERNAME_LENGTH: u64 = 30;

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 5;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 30;

/// Maximum length of first and last names
pub const MAX_NAME_LENGTH: u64 = 30;

// =============================================================================
// Messages
// =============================================================================

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_USERNAME: &str = r#"Only A-Z, 0-9, "_", "-", and "." allowed."#;
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
pub const MSG_PASSWORDS_MUST_MATCH: &str = "Passwords must match";
pub const MSG_USERNAME_TAKEN: &str = "Sorry, this username is taken.";

/// Message for a value longer than `max` characters.
pub fn msg_too_long(max: u64, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        max, actual
    )
}

/// Message for a value shorter than `min` characters.
pub fn msg_too_short(min: u64, actual: usize) -> String {
    format!(
        "Ensure this value has at least {} characters (it has {}).",
        min, actual
    )
}
