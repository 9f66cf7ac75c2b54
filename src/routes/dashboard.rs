//! Dashboard statistics route.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::ApiQuery;
use crate::models::date_range::{DateRange, DateRangeQuery};
use crate::services::dashboard::{self as dashboard_service, DashboardStats};
use crate::AppState;

/// GET /api/dashboard?from&to
pub async fn get_stats(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let range = DateRange::parse(&query)?;
    let stats = dashboard_service::get_stats(&state.db, &range).await?;
    Ok(ApiResponse::success(stats))
}
