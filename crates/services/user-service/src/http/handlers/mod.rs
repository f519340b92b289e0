//! HTTP handlers.

mod health_handler;
mod registration_handler;

pub use health_handler::{health_check, health_routes};
pub use registration_handler::{register, registration_routes};
