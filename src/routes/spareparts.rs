//! Spare part routes. Reads are public; writes take a multipart form with an
//! optional `image` file.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{read_upload_form, ApiPath};
use crate::models::sparepart::{Sparepart, SparepartCreated, SparepartUpdated};
use crate::services::sparepart as sparepart_service;
use crate::AppState;

/// GET /api/spareparts
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Sparepart>>>, AppError> {
    let parts = sparepart_service::list(&state.db).await?;
    Ok(ApiResponse::success(parts))
}

/// GET /api/spareparts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Sparepart>>, AppError> {
    let part = sparepart_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(part))
}

/// POST /api/spareparts
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SparepartCreated>>), AppError> {
    let form = read_upload_form(multipart, "image").await?;
    let part = sparepart_service::create(&state.db, state.media.as_ref(), form).await?;
    Ok(ApiResponse::created(SparepartCreated {
        message: "SparePart uploaded!".to_string(),
        part,
    }))
}

/// PUT /api/spareparts/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SparepartUpdated>>, AppError> {
    let form = read_upload_form(multipart, "image").await?;
    let sparepart = sparepart_service::update(&state.db, state.media.as_ref(), id, form).await?;
    Ok(ApiResponse::success(SparepartUpdated {
        message: "Part updated!".to_string(),
        sparepart,
    }))
}

/// DELETE /api/spareparts/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    sparepart_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Spare part deleted")))
}
