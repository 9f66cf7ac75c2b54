//! Bet CRUD and settlement rules.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::bet::{Bet, BetDetail, BetResult, CreateBet, UpdateBet};
use crate::services::{flight, player};

/// Resolve the payout stored with a bet.
///
/// A payout is non-zero exactly when the bet is a win. A win without an
/// explicit payout settles at `amount * odds`.
pub fn settle(
    amount: f64,
    odds: f64,
    result: BetResult,
    payout: Option<f64>,
) -> Result<f64, AppError> {
    match (result, payout) {
        (BetResult::Win, None) => Ok(amount * odds),
        (BetResult::Win, Some(p)) if p == 0.0 => Err(AppError::Validation(
            "A winning bet must have a non-zero payout".to_string(),
        )),
        (BetResult::Win, Some(p)) => Ok(p),
        (_, None) => Ok(0.0),
        (_, Some(p)) if p == 0.0 => Ok(0.0),
        (_, Some(_)) => Err(AppError::Validation(
            "Only winning bets can carry a payout".to_string(),
        )),
    }
}

/// List bets, newest first, each with its player and flight.
pub async fn list(pool: &PgPool) -> Result<Vec<BetDetail>, AppError> {
    let bets = sqlx::query_as::<_, Bet>("SELECT * FROM bets ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    populate(pool, bets).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<BetDetail, AppError> {
    let bet = find_row(pool, id).await?;
    populate_one(pool, bet).await
}

async fn find_row(pool: &PgPool, id: Uuid) -> Result<Bet, AppError> {
    sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Bet not found".to_string()))
}

pub async fn create(pool: &PgPool, input: &CreateBet) -> Result<BetDetail, AppError> {
    let result = input.result.unwrap_or_default();
    let payout = settle(input.amount, input.odds, result, input.payout)?;

    player::ensure_exists(pool, input.player_id).await?;
    if let Some(flight_id) = input.flight_id {
        flight::ensure_exists(pool, flight_id).await?;
    }

    let bet = sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (player_id, flight_id, amount, odds, result, payout)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(input.player_id)
    .bind(input.flight_id)
    .bind(input.amount)
    .bind(input.odds)
    .bind(result)
    .bind(payout)
    .fetch_one(pool)
    .await?;

    tracing::info!(bet_id = %bet.id, player_id = %bet.player_id, result = ?bet.result, "Bet created");
    populate_one(pool, bet).await
}

/// Merge the update into the stored bet, then re-check settlement.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateBet) -> Result<BetDetail, AppError> {
    let existing = find_row(pool, id).await?;

    let amount = input.amount.unwrap_or(existing.amount);
    let odds = input.odds.unwrap_or(existing.odds);
    let result = input.result.unwrap_or(existing.result);
    // A changed result without an explicit payout is settled afresh.
    let payout = match (input.payout, input.result) {
        (Some(p), _) => Some(p),
        (None, Some(r)) if r != existing.result => None,
        (None, _) => Some(existing.payout),
    };
    let payout = settle(amount, odds, result, payout)?;

    if let Some(player_id) = input.player_id {
        player::ensure_exists(pool, player_id).await?;
    }
    if let Some(flight_id) = input.flight_id {
        flight::ensure_exists(pool, flight_id).await?;
    }

    let bet = sqlx::query_as::<_, Bet>(
        r#"
        UPDATE bets SET
            player_id = COALESCE($2, player_id),
            flight_id = COALESCE($3, flight_id),
            amount = $4,
            odds = $5,
            result = $6,
            payout = $7,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.player_id)
    .bind(input.flight_id)
    .bind(amount)
    .bind(odds)
    .bind(result)
    .bind(payout)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Bet not found".to_string()))?;

    populate_one(pool, bet).await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM bets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Bet not found".to_string()));
    }
    Ok(())
}

async fn populate_one(pool: &PgPool, bet: Bet) -> Result<BetDetail, AppError> {
    populate(pool, vec![bet])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("Bet not found".to_string()))
}

async fn populate(pool: &PgPool, bets: Vec<Bet>) -> Result<Vec<BetDetail>, AppError> {
    let player_ids: Vec<Uuid> = bets.iter().map(|b| b.player_id).collect();
    let flight_ids: Vec<Uuid> = bets.iter().filter_map(|b| b.flight_id).collect();

    let (players, flights) = tokio::try_join!(
        player::find_by_ids(pool, &player_ids),
        flight::find_by_ids(pool, &flight_ids),
    )?;

    Ok(bets
        .into_iter()
        .map(|bet| BetDetail {
            player: players.get(&bet.player_id).cloned(),
            flight: bet.flight_id.and_then(|id| flights.get(&id).cloned()),
            bet,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_without_payout_settles_at_odds() {
        assert_eq!(settle(500.0, 2.5, BetResult::Win, None).unwrap(), 1250.0);
    }

    #[test]
    fn win_keeps_explicit_payout() {
        assert_eq!(settle(500.0, 2.5, BetResult::Win, Some(1200.0)).unwrap(), 1200.0);
    }

    #[test]
    fn win_with_zero_payout_rejected() {
        assert!(matches!(
            settle(500.0, 2.5, BetResult::Win, Some(0.0)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn lose_and_pending_settle_to_zero() {
        assert_eq!(settle(1000.0, 1.8, BetResult::Lose, None).unwrap(), 0.0);
        assert_eq!(settle(1000.0, 1.8, BetResult::Pending, Some(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn non_win_with_payout_rejected() {
        for result in [BetResult::Lose, BetResult::Pending] {
            assert!(matches!(
                settle(1000.0, 1.8, result, Some(50.0)),
                Err(AppError::Validation(_))
            ));
        }
    }
}
