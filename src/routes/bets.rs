//! Bet routes. Reads embed the bet's player and flight.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{ApiPath, ValidatedJson};
use crate::models::bet::{BetDetail, CreateBet, UpdateBet};
use crate::services::bet as bet_service;
use crate::AppState;

/// GET /api/bets
pub async fn list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<Vec<BetDetail>>>, AppError> {
    let bets = bet_service::list(&state.db).await?;
    Ok(ApiResponse::success(bets))
}

/// POST /api/bets: a win without `payout` settles at `amount * odds`.
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(body): ValidatedJson<CreateBet>,
) -> Result<(StatusCode, Json<ApiResponse<BetDetail>>), AppError> {
    let bet = bet_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(bet))
}

/// GET /api/bets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<BetDetail>>, AppError> {
    let bet = bet_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(bet))
}

/// PUT /api/bets/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateBet>,
) -> Result<Json<ApiResponse<BetDetail>>, AppError> {
    let bet = bet_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(bet))
}

/// DELETE /api/bets/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    bet_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Bet deleted")))
}
