//! Flight CRUD with flight plan population.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::flight::{CreateFlight, Flight, FlightDetail, UpdateFlight};
use crate::services::flight_plan;

/// List flights, newest first, each with its flight plan.
pub async fn list(pool: &PgPool) -> Result<Vec<FlightDetail>, AppError> {
    let flights = sqlx::query_as::<_, Flight>("SELECT * FROM flights ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    attach_plans(pool, flights).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<FlightDetail, AppError> {
    let flight = find_row(pool, id).await?;
    let mut details = attach_plans(pool, vec![flight]).await?;
    details
        .pop()
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))
}

async fn find_row(pool: &PgPool, id: Uuid) -> Result<Flight, AppError> {
    sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))
}

pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, Flight>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let flights = sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(flights.into_iter().map(|f| (f.id, f)).collect())
}

/// Reject a reference to a flight that does not exist.
pub async fn ensure_exists(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM flights WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Flight {id} does not exist")))
    }
}

pub async fn create(pool: &PgPool, input: &CreateFlight) -> Result<FlightDetail, AppError> {
    let multiplier = input
        .multiplier
        .ok_or_else(|| AppError::Validation("Multiplier is required".to_string()))?;

    if let Some(plan_id) = input.flight_plan_id {
        flight_plan::ensure_exists(pool, plan_id).await?;
    }

    let flight = sqlx::query_as::<_, Flight>(
        r#"
        INSERT INTO flights (flight_number, start_time, end_time, result, multiplier, players, flight_plan_id)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7)
        RETURNING *
        "#,
    )
    .bind(&input.flight_number)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(&input.result)
    .bind(multiplier)
    .bind(input.players)
    .bind(input.flight_plan_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(flight_id = %flight.id, flight_number = %flight.flight_number, "Flight created");
    find_by_id(pool, flight.id).await
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateFlight) -> Result<FlightDetail, AppError> {
    // 404 before reference checks
    find_row(pool, id).await?;

    if let Some(plan_id) = input.flight_plan_id {
        flight_plan::ensure_exists(pool, plan_id).await?;
    }

    let flight = sqlx::query_as::<_, Flight>(
        r#"
        UPDATE flights SET
            flight_number = COALESCE($2, flight_number),
            start_time = COALESCE($3, start_time),
            end_time = COALESCE($4, end_time),
            result = COALESCE($5, result),
            multiplier = COALESCE($6, multiplier),
            players = COALESCE($7, players),
            flight_plan_id = COALESCE($8, flight_plan_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.flight_number)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(&input.result)
    .bind(input.multiplier)
    .bind(input.players)
    .bind(input.flight_plan_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let mut details = attach_plans(pool, vec![flight]).await?;
    details
        .pop()
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM flights WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Flight not found".to_string()));
    }
    Ok(())
}

async fn attach_plans(pool: &PgPool, flights: Vec<Flight>) -> Result<Vec<FlightDetail>, AppError> {
    let plan_ids: Vec<Uuid> = flights.iter().filter_map(|f| f.flight_plan_id).collect();
    let plans = flight_plan::find_by_ids(pool, &plan_ids).await?;

    Ok(flights
        .into_iter()
        .map(|flight| {
            let flight_plan = flight
                .flight_plan_id
                .and_then(|id| plans.get(&id).cloned());
            FlightDetail { flight, flight_plan }
        })
        .collect())
}
