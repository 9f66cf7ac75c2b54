//! Flight plan CRUD.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::flight_plan::{CreateFlightPlan, FlightPlan, UpdateFlightPlan};

pub async fn list(pool: &PgPool) -> Result<Vec<FlightPlan>, AppError> {
    let plans =
        sqlx::query_as::<_, FlightPlan>("SELECT * FROM flight_plans ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    Ok(plans)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<FlightPlan, AppError> {
    sqlx::query_as::<_, FlightPlan>("SELECT * FROM flight_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight plan not found".to_string()))
}

pub async fn find_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, FlightPlan>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let plans = sqlx::query_as::<_, FlightPlan>("SELECT * FROM flight_plans WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(plans.into_iter().map(|p| (p.id, p)).collect())
}

/// Reject a reference to a flight plan that does not exist.
pub async fn ensure_exists(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM flight_plans WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Flight plan {id} does not exist")))
    }
}

pub async fn create(pool: &PgPool, input: &CreateFlightPlan) -> Result<FlightPlan, AppError> {
    let plan = sqlx::query_as::<_, FlightPlan>(
        r#"
        INSERT INTO flight_plans (name, description, is_active)
        VALUES ($1, $2, COALESCE($3, TRUE))
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    tracing::info!(flight_plan_id = %plan.id, name = %plan.name, "Flight plan created");
    Ok(plan)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateFlightPlan,
) -> Result<FlightPlan, AppError> {
    sqlx::query_as::<_, FlightPlan>(
        r#"
        UPDATE flight_plans SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            is_active = COALESCE($4, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Flight plan not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM flight_plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Flight plan not found".to_string()));
    }
    Ok(())
}
