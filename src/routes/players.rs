//! Read-only player routes.

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::ApiPath;
use crate::models::player::Player;
use crate::services::player as player_service;
use crate::AppState;

/// GET /api/players
pub async fn list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<Vec<Player>>>, AppError> {
    let players = player_service::list(&state.db).await?;
    Ok(ApiResponse::success(players))
}

/// GET /api/players/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Player>>, AppError> {
    let player = player_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(player))
}
