//! Settings routes.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{ApiPath, ValidatedJson};
use crate::models::setting::{CreateSetting, Setting, UpdateSetting};
use crate::services::setting as setting_service;
use crate::AppState;

/// GET /api/settings, ordered by key.
pub async fn list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<Vec<Setting>>>, AppError> {
    let settings = setting_service::list(&state.db).await?;
    Ok(ApiResponse::success(settings))
}

/// POST /api/settings
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(body): ValidatedJson<CreateSetting>,
) -> Result<(StatusCode, Json<ApiResponse<Setting>>), AppError> {
    let setting = setting_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(setting))
}

/// GET /api/settings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Setting>>, AppError> {
    let setting = setting_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(setting))
}

/// PUT /api/settings/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateSetting>,
) -> Result<Json<ApiResponse<Setting>>, AppError> {
    let setting = setting_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(setting))
}

/// DELETE /api/settings/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    setting_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Setting deleted")))
}
