//! Authentication routes: one-time registration, login, logout.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::extract::ValidatedJson;
use crate::models::admin::{AdminResponse, Credentials};
use crate::services::auth as auth_service;
use crate::services::auth::LoginResponse;
use crate::AppState;

/// POST /auth/register: create the admin while none exists.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<Credentials>,
) -> Result<(StatusCode, Json<ApiResponse<AdminResponse>>), AppError> {
    let admin = auth_service::register(&state.db, &body).await?;
    Ok(ApiResponse::created(admin))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<Credentials>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = auth_service::login(
        &state.db,
        &body,
        &state.config.jwt_secret,
        state.config.jwt_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(response))
}

/// POST /logout: tokens are stateless, the client discards its copy.
pub async fn logout() -> Json<ApiResponse<Ack>> {
    ApiResponse::success(Ack::new("Logged out"))
}
