//! User Service Library
//!
//! User registration over HTTP: binds submissions to the registration form
//! and creates accounts through the SeaORM user store.

pub mod config;
pub mod http;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::UserServiceConfig;
use crate::http::{create_router, AppState};
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::Registrar;

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Build the application state on top of a connected database.
pub fn build_state(database: Database) -> AppState {
    let user_repo = Arc::new(UserStore::new(database.get_connection()));
    let registrations = Arc::new(Registrar::new(user_repo));

    AppState::new(registrations, database)
}

/// Run the HTTP server.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let database = Database::connect(&config.database).await?;
    let app = create_router(build_state(database));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("User service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}
