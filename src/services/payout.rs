//! Payout CRUD and the review state machine.
//!
//! A payout starts pending and is reviewed exactly once: pending moves to
//! approved or rejected, and both of those are terminal.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::payout::{CreatePayout, Payout, PayoutDetail, PayoutStatus, UpdatePayout};
use crate::services::player;

/// Check whether a status change is allowed by the review graph.
pub fn is_valid_transition(from: PayoutStatus, to: PayoutStatus) -> bool {
    matches!(
        (from, to),
        (PayoutStatus::Pending, PayoutStatus::Approved)
            | (PayoutStatus::Pending, PayoutStatus::Rejected)
    )
}

/// Validate a requested status against the stored one.
///
/// Returns `true` when the status actually changes. Re-asserting the current
/// status is accepted as a no-op.
pub fn check_transition(from: PayoutStatus, to: PayoutStatus) -> Result<bool, AppError> {
    if from == to {
        return Ok(false);
    }
    if !is_valid_transition(from, to) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot move payout from {} to {}",
            status_name(from),
            status_name(to)
        )));
    }
    Ok(true)
}

fn status_name(status: PayoutStatus) -> &'static str {
    match status {
        PayoutStatus::Pending => "pending",
        PayoutStatus::Approved => "approved",
        PayoutStatus::Rejected => "rejected",
    }
}

/// List payouts, newest first, each with its player.
pub async fn list(pool: &PgPool) -> Result<Vec<PayoutDetail>, AppError> {
    let payouts = sqlx::query_as::<_, Payout>("SELECT * FROM payouts ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    populate(pool, payouts).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<PayoutDetail, AppError> {
    let payout = find_row(pool, id).await?;
    populate_one(pool, payout).await
}

async fn find_row(pool: &PgPool, id: Uuid) -> Result<Payout, AppError> {
    sqlx::query_as::<_, Payout>("SELECT * FROM payouts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Payout not found".to_string()))
}

pub async fn create(pool: &PgPool, input: &CreatePayout) -> Result<PayoutDetail, AppError> {
    player::ensure_exists(pool, input.player_id).await?;

    let status = input.status.unwrap_or_default();
    let processed_at = match status {
        PayoutStatus::Pending => input.processed_at,
        _ => input.processed_at.or_else(|| Some(Utc::now())),
    };

    let payout = sqlx::query_as::<_, Payout>(
        r#"
        INSERT INTO payouts (player_id, amount, status, requested_at, processed_at)
        VALUES ($1, $2, $3, COALESCE($4, NOW()), $5)
        RETURNING *
        "#,
    )
    .bind(input.player_id)
    .bind(input.amount)
    .bind(status)
    .bind(input.requested_at)
    .bind(processed_at)
    .fetch_one(pool)
    .await?;

    tracing::info!(payout_id = %payout.id, player_id = %payout.player_id, amount = payout.amount, "Payout created");
    populate_one(pool, payout).await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdatePayout,
) -> Result<PayoutDetail, AppError> {
    let existing = find_row(pool, id).await?;

    let status = input.status.unwrap_or(existing.status);
    let changed = check_transition(existing.status, status)?;
    let processed_at = if changed {
        input.processed_at.or_else(|| Some(Utc::now()))
    } else {
        input.processed_at.or(existing.processed_at)
    };

    let payout = sqlx::query_as::<_, Payout>(
        r#"
        UPDATE payouts SET
            amount = COALESCE($2, amount),
            status = $3,
            processed_at = $4,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.amount)
    .bind(status)
    .bind(processed_at)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Payout not found".to_string()))?;

    if changed {
        tracing::info!(
            payout_id = %payout.id,
            from = status_name(existing.status),
            to = status_name(status),
            "Payout reviewed"
        );
    }
    populate_one(pool, payout).await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM payouts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Payout not found".to_string()));
    }
    Ok(())
}

async fn populate_one(pool: &PgPool, payout: Payout) -> Result<PayoutDetail, AppError> {
    populate(pool, vec![payout])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("Payout not found".to_string()))
}

async fn populate(pool: &PgPool, payouts: Vec<Payout>) -> Result<Vec<PayoutDetail>, AppError> {
    let player_ids: Vec<Uuid> = payouts.iter().map(|p| p.player_id).collect();
    let players = player::find_by_ids(pool, &player_ids).await?;

    Ok(payouts
        .into_iter()
        .map(|payout| PayoutDetail {
            player: players.get(&payout.player_id).cloned(),
            payout,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert!(is_valid_transition(PayoutStatus::Pending, PayoutStatus::Approved));
        assert!(is_valid_transition(PayoutStatus::Pending, PayoutStatus::Rejected));
    }

    #[test]
    fn reviewed_payouts_are_terminal() {
        for from in [PayoutStatus::Approved, PayoutStatus::Rejected] {
            for to in [PayoutStatus::Pending, PayoutStatus::Approved, PayoutStatus::Rejected] {
                if from != to {
                    assert!(!is_valid_transition(from, to));
                    assert!(matches!(
                        check_transition(from, to),
                        Err(AppError::InvalidTransition(_))
                    ));
                }
            }
        }
    }

    #[test]
    fn same_status_is_a_no_op() {
        assert!(!check_transition(PayoutStatus::Approved, PayoutStatus::Approved).unwrap());
        assert!(!check_transition(PayoutStatus::Pending, PayoutStatus::Pending).unwrap());
    }

    #[test]
    fn real_change_is_reported() {
        assert!(check_transition(PayoutStatus::Pending, PayoutStatus::Rejected).unwrap());
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = check_transition(PayoutStatus::Rejected, PayoutStatus::Approved).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition: Cannot move payout from rejected to approved"
        );
    }
}
