//! Flight routes. Reads embed the flight plan.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{ApiPath, ValidatedJson};
use crate::models::flight::{CreateFlight, FlightDetail, UpdateFlight};
use crate::services::flight as flight_service;
use crate::AppState;

/// GET /api/flights
pub async fn list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<Vec<FlightDetail>>>, AppError> {
    let flights = flight_service::list(&state.db).await?;
    Ok(ApiResponse::success(flights))
}

/// POST /api/flights
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(body): ValidatedJson<CreateFlight>,
) -> Result<(StatusCode, Json<ApiResponse<FlightDetail>>), AppError> {
    let flight = flight_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(flight))
}

/// GET /api/flights/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<FlightDetail>>, AppError> {
    let flight = flight_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(flight))
}

/// PUT /api/flights/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateFlight>,
) -> Result<Json<ApiResponse<FlightDetail>>, AppError> {
    let flight = flight_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(flight))
}

/// DELETE /api/flights/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    flight_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Flight deleted")))
}
