//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::Database;
use crate::service::RegistrationService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registrations: Arc<dyn RegistrationService>,
    pub database: Database,
}

impl AppState {
    /// Create new app state.
    pub fn new(registrations: Arc<dyn RegistrationService>, database: Database) -> Self {
        Self {
            registrations,
            database,
        }
    }
}
