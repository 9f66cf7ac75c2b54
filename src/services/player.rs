//! Player lookups. Players are created outside the console; it only reads them.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::player::Player;

/// List all players, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Player>, AppError> {
    let players = sqlx::query_as::<_, Player>("SELECT * FROM players ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(players)
}

/// Find player by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Player, AppError> {
    sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".to_string()))
}

/// Load the players referenced by a batch of records, keyed by id.
pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, Player>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let players = sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(players.into_iter().map(|p| (p.id, p)).collect())
}

/// Reject a reference to a player that does not exist.
pub async fn ensure_exists(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM players WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Player {id} does not exist")))
    }
}
