//! Registration form.
//!
//! Binding a [`RegistrationData`] submission cleans every field, runs the
//! declared constraints and the password confirmation check, and records all
//! failures in [`FormErrors`]. Nothing here touches storage; creating the
//! account from a valid form is the user service's job.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::constants::*;
use crate::form_errors::FormErrors;
use crate::user::normalize_email;

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(USERNAME_PATTERN).expect("username pattern is a valid regex"));

static EMAIL_DOMAIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_DOMAIN_PATTERN).expect("email pattern is a valid regex"));

/// Raw registration submission.
///
/// Missing fields deserialize to the empty string so that they surface as
/// "required" errors instead of a deserialization failure.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationData {
    pub username: String,
    pub password1: String,
    pub password2: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Debug for RegistrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationData")
            .field("username", &self.username)
            .field("password1", &"[REDACTED]")
            .field("password2", &"[REDACTED]")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Field values after cleaning.
///
/// Only a fully valid form exposes one of these.
#[derive(Clone, PartialEq, Eq, Validate)]
pub struct CleanedRegistration {
    #[validate(
        length(max = 30),
        regex(path = *USERNAME_REGEX, message = r#"Only A-Z, 0-9, "_", "-", and "." allowed."#)
    )]
    pub username: String,
    #[validate(length(min = 5, max = 30))]
    pub password1: String,
    pub password2: String,
    #[validate(
        length(max = 254),
        email(message = "Enter a valid email address."),
        regex(path = *EMAIL_DOMAIN_REGEX, message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(length(max = 30))]
    pub first_name: String,
    #[validate(length(max = 30))]
    pub last_name: String,
}

impl fmt::Debug for CleanedRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanedRegistration")
            .field("username", &self.username)
            .field("password1", &"[REDACTED]")
            .field("password2", &"[REDACTED]")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

impl CleanedRegistration {
    /// Strip surrounding whitespace from text fields. Passwords are kept
    /// verbatim.
    fn from_data(data: &RegistrationData) -> Self {
        Self {
            username: data.username.trim().to_string(),
            password1: data.password1.clone(),
            password2: data.password2.clone(),
            email: data.email.trim().to_string(),
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
        }
    }

    fn value(&self, field: &str) -> &str {
        match field {
            FIELD_USERNAME => &self.username,
            FIELD_PASSWORD1 => &self.password1,
            FIELD_PASSWORD2 => &self.password2,
            FIELD_EMAIL => &self.email,
            FIELD_FIRST_NAME => &self.first_name,
            FIELD_LAST_NAME => &self.last_name,
            _ => "",
        }
    }
}

/// Length bounds per field, mirrored from the `validate` attributes above
fn length_bounds(field: &str) -> (Option<u64>, Option<u64>) {
    match field {
        FIELD_USERNAME => (None, Some(MAX_USERNAME_LENGTH)),
        FIELD_PASSWORD1 => (Some(MIN_PASSWORD_LENGTH), Some(MAX_PASSWORD_LENGTH)),
        FIELD_EMAIL => (None, Some(MAX_EMAIL_LENGTH)),
        FIELD_FIRST_NAME | FIELD_LAST_NAME => (None, Some(MAX_NAME_LENGTH)),
        _ => (None, None),
    }
}

const REQUIRED_FIELDS: &[&str] = &[FIELD_USERNAME, FIELD_PASSWORD1, FIELD_PASSWORD2, FIELD_EMAIL];

/// A bound registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    data: RegistrationData,
    errors: FormErrors,
    cleaned: Option<CleanedRegistration>,
}

impl RegistrationForm {
    /// Bind a submission and validate it.
    pub fn bind(data: RegistrationData) -> Self {
        let mut form = Self {
            data,
            errors: FormErrors::new(),
            cleaned: None,
        };
        form.full_clean();
        form
    }

    fn full_clean(&mut self) {
        let mut candidate = CleanedRegistration::from_data(&self.data);

        for field in REQUIRED_FIELDS {
            if candidate.value(field).is_empty() {
                self.errors.add(field, MSG_REQUIRED);
            }
        }

        if let Err(validation) = candidate.validate() {
            for (field, failures) in validation.field_errors() {
                let field: &str = &field;
                // A missing value only reports that it is required
                if candidate.value(field).is_empty() {
                    continue;
                }
                for failure in failures {
                    let message = describe(field, candidate.value(field), failure);
                    // Email syntax is checked twice; report it once
                    if self.errors.get(field).is_some_and(|m| m.contains(&message)) {
                        continue;
                    }
                    self.errors.add(field, message);
                }
            }
        }

        self.clean_password2(&candidate);

        if self.errors.is_empty() {
            candidate.email = normalize_email(&candidate.email);
            self.cleaned = Some(candidate);
        }
    }

    /// Confirmation must equal the submitted password, whether or not the
    /// password passed its own constraints.
    fn clean_password2(&mut self, candidate: &CleanedRegistration) {
        if candidate.password2.is_empty() {
            return;
        }
        if candidate.password1 != candidate.password2 {
            self.errors.add(FIELD_PASSWORD2, MSG_PASSWORDS_MUST_MATCH);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FormErrors {
        self.errors
    }

    /// The submission as received
    pub fn data(&self) -> &RegistrationData {
        &self.data
    }

    /// Cleaned values; `None` unless every field validated
    pub fn cleaned_data(&self) -> Option<&CleanedRegistration> {
        self.cleaned.as_ref()
    }

    /// Replace all errors of a field
    pub fn set_field_errors(&mut self, field: &str, messages: Vec<String>) {
        self.errors.set(field, messages);
    }
}

fn describe(field: &str, value: &str, failure: &ValidationError) -> String {
    if failure.code == "length" {
        let count = value.chars().count();
        let (min, max) = length_bounds(field);
        if let Some(max) = max {
            if count as u64 > max {
                return msg_too_long(max, count);
            }
        }
        if let Some(min) = min {
            return msg_too_short(min, count);
        }
    }

    failure
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| "Enter a valid value.".to_string())
}
