//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity, password hashing, and the registration form with its
//! field constraints.

pub mod constants;
pub mod error;
pub mod form_errors;
pub mod password;
pub mod registration;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use form_errors::FormErrors;
pub use password::Password;
pub use registration::{CleanedRegistration, RegistrationData, RegistrationForm};
pub use user::{normalize_email, User, UserResponse};
