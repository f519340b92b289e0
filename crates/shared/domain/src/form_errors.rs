//! Per-field validation errors collected by a form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields carrying at least one error
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Append a message to a field's error list
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Replace a field's error list
    pub fn set(&mut self, field: &str, messages: Vec<String>) {
        if messages.is_empty() {
            self.0.remove(field);
        } else {
            self.0.insert(field.to_string(), messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Names of the fields that have errors, in sorted order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// First message of the first field with errors
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .find_map(|messages| messages.first())
            .map(String::as_str)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates_per_field() {
        let mut errors = FormErrors::new();
        errors.add("username", "first");
        errors.add("username", "second");
        errors.add("email", "bad");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("username").unwrap(), ["first", "second"]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["email", "username"]);
    }

    #[test]
    fn test_set_replaces_and_empty_set_removes() {
        let mut errors = FormErrors::new();
        errors.add("username", "old");
        errors.set("username", vec!["new".to_string()]);
        assert_eq!(errors.get("username").unwrap(), ["new"]);

        errors.set("username", Vec::new());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut errors = FormErrors::new();
        errors.add("password2", "Passwords must match");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"password2": ["Passwords must match"]}));
    }

    #[test]
    fn test_display() {
        let mut errors = FormErrors::new();
        errors.add("email", "a");
        errors.add("username", "b");

        assert_eq!(errors.to_string(), "email: a; username: b");
    }
}
