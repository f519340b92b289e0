//! Registration handler.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};

use common::{AppError, AppResult};
use domain::{RegistrationData, RegistrationForm, UserResponse};

use crate::http::extractors::FormJson;
use crate::http::state::AppState;

/// Create registration routes
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Register a new user.
///
/// 201 with the created user, or 400 with per-field errors.
pub async fn register(
    State(state): State<AppState>,
    FormJson(payload): FormJson<RegistrationData>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut form = RegistrationForm::bind(payload);

    match state.registrations.save(&mut form).await? {
        Some(user) => Ok((StatusCode::CREATED, Json(UserResponse::from(user)))),
        None => Err(AppError::from(form.into_errors())),
    }
}
