//! Payout routes. Status changes follow the review state machine.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{ApiPath, ValidatedJson};
use crate::models::payout::{CreatePayout, PayoutDetail, UpdatePayout};
use crate::services::payout as payout_service;
use crate::AppState;

/// GET /api/payouts
pub async fn list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<Vec<PayoutDetail>>>, AppError> {
    let payouts = payout_service::list(&state.db).await?;
    Ok(ApiResponse::success(payouts))
}

/// POST /api/payouts
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(body): ValidatedJson<CreatePayout>,
) -> Result<(StatusCode, Json<ApiResponse<PayoutDetail>>), AppError> {
    let payout = payout_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(payout))
}

/// GET /api/payouts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<PayoutDetail>>, AppError> {
    let payout = payout_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(payout))
}

/// PUT /api/payouts/{id}
///
/// Approving or rejecting a pending payout stamps `processedAt`; any other
/// status change is a 400 `INVALID_TRANSITION`.
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdatePayout>,
) -> Result<Json<ApiResponse<PayoutDetail>>, AppError> {
    let payout = payout_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(payout))
}

/// DELETE /api/payouts/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    payout_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Payout deleted")))
}
