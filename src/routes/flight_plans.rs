//! Flight plan routes.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{ApiPath, ValidatedJson};
use crate::models::flight_plan::{CreateFlightPlan, FlightPlan, UpdateFlightPlan};
use crate::services::flight_plan as plan_service;
use crate::AppState;

/// GET /api/flight-plans
pub async fn list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
) -> Result<Json<ApiResponse<Vec<FlightPlan>>>, AppError> {
    let plans = plan_service::list(&state.db).await?;
    Ok(ApiResponse::success(plans))
}

/// POST /api/flight-plans
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(body): ValidatedJson<CreateFlightPlan>,
) -> Result<(StatusCode, Json<ApiResponse<FlightPlan>>), AppError> {
    let plan = plan_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(plan))
}

/// GET /api/flight-plans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<FlightPlan>>, AppError> {
    let plan = plan_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(plan))
}

/// PUT /api/flight-plans/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateFlightPlan>,
) -> Result<Json<ApiResponse<FlightPlan>>, AppError> {
    let plan = plan_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(plan))
}

/// DELETE /api/flight-plans/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    plan_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Flight plan deleted")))
}
