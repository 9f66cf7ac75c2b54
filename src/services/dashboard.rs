//! Dashboard statistics aggregation queries.
//!
//! Every figure is computed fresh per request over records whose
//! `created_at` falls inside the optional `[from, to]` window.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::bet::{Bet, BetResult};
use crate::models::date_range::DateRange;
use crate::models::player::Player;
use crate::services::player;

/// Number of rows in each "recent" and "top" list.
const FEED_SIZE: i64 = 5;

/// Window predicate shared by every query; `$1`/`$2` are the optional bounds.
const IN_RANGE: &str =
    "($1::timestamptz IS NULL OR created_at >= $1) AND ($2::timestamptz IS NULL OR created_at <= $2)";

/// Aggregated dashboard statistics for the overview page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub bets_by_result: Vec<ResultBucket>,
    pub total_payout_amount: f64,
    pub recent_bets: Vec<RecentBet>,
    pub recent_players: Vec<Player>,
    pub top_players: Vec<TopPlayer>,
    pub total_bets: i64,
    pub total_players: i64,
    pub total_payouts: i64,
    pub total_flights: i64,
    pub total_products: i64,
}

/// Bet count and wagered amount for one result.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResultBucket {
    #[serde(rename = "_id")]
    pub result: BetResult,
    pub count: i64,
    pub total_amount: f64,
}

/// Recent bet with its player embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentBet {
    #[serde(flatten)]
    pub bet: Bet,
    pub player: Option<Player>,
}

/// A player's wagering total over the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPlayer {
    #[serde(rename = "_id")]
    pub player_id: Uuid,
    pub total_bet: f64,
    pub count: i64,
    pub player: Option<Player>,
}

#[derive(Debug, sqlx::FromRow)]
struct PlayerTotalRow {
    player_id: Uuid,
    total_bet: f64,
    count: i64,
}

/// Fetch all dashboard statistics in parallel queries.
pub async fn get_stats(pool: &PgPool, range: &DateRange) -> Result<DashboardStats, AppError> {
    let (
        bets_by_result,
        total_payout_amount,
        recent_bets,
        recent_players,
        top_players,
        total_bets,
        total_players,
        total_payouts,
        total_flights,
        total_products,
    ) = tokio::try_join!(
        fetch_bets_by_result(pool, range),
        fetch_total_payout_amount(pool, range),
        fetch_recent_bets(pool, range),
        fetch_recent_players(pool, range),
        fetch_top_players(pool, range),
        count_in_range(pool, "bets", range),
        count_in_range(pool, "players", range),
        count_in_range(pool, "payouts", range),
        count_in_range(pool, "flights", range),
        count_in_range(pool, "products", range),
    )?;

    Ok(DashboardStats {
        bets_by_result,
        total_payout_amount,
        recent_bets,
        recent_players,
        top_players,
        total_bets,
        total_players,
        total_payouts,
        total_flights,
        total_products,
    })
}

/// Group bets by result, ordered win, lose, pending (enum declaration order).
async fn fetch_bets_by_result(
    pool: &PgPool,
    range: &DateRange,
) -> Result<Vec<ResultBucket>, AppError> {
    let sql = format!(
        "SELECT result, COUNT(*) AS count, COALESCE(SUM(amount), 0)::float8 AS total_amount \
         FROM bets WHERE {IN_RANGE} GROUP BY result ORDER BY result"
    );
    let rows = sqlx::query_as::<_, ResultBucket>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_total_payout_amount(pool: &PgPool, range: &DateRange) -> Result<f64, AppError> {
    let sql = format!("SELECT COALESCE(SUM(amount), 0)::float8 FROM payouts WHERE {IN_RANGE}");
    let total = sqlx::query_scalar::<_, f64>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

async fn fetch_recent_bets(pool: &PgPool, range: &DateRange) -> Result<Vec<RecentBet>, AppError> {
    let sql = format!("SELECT * FROM bets WHERE {IN_RANGE} ORDER BY created_at DESC LIMIT {FEED_SIZE}");
    let bets = sqlx::query_as::<_, Bet>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await?;

    let ids: Vec<Uuid> = bets.iter().map(|b| b.player_id).collect();
    let players = player::find_by_ids(pool, &ids).await?;

    Ok(bets
        .into_iter()
        .map(|bet| RecentBet {
            player: players.get(&bet.player_id).cloned(),
            bet,
        })
        .collect())
}

async fn fetch_recent_players(pool: &PgPool, range: &DateRange) -> Result<Vec<Player>, AppError> {
    let sql =
        format!("SELECT * FROM players WHERE {IN_RANGE} ORDER BY created_at DESC LIMIT {FEED_SIZE}");
    let players = sqlx::query_as::<_, Player>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await?;
    Ok(players)
}

/// Top wagering players. Ties on `total_bet` break on bet count, then username.
async fn fetch_top_players(pool: &PgPool, range: &DateRange) -> Result<Vec<TopPlayer>, AppError> {
    let sql = format!(
        r#"
        SELECT b.player_id, SUM(b.amount)::float8 AS total_bet, COUNT(*) AS count
        FROM bets b
        JOIN players p ON p.id = b.player_id
        WHERE {}
        GROUP BY b.player_id, p.username
        ORDER BY total_bet DESC, count DESC, p.username ASC
        LIMIT {FEED_SIZE}
        "#,
        IN_RANGE.replace("created_at", "b.created_at")
    );
    let rows = sqlx::query_as::<_, PlayerTotalRow>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(pool)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.player_id).collect();
    let players = player::find_by_ids(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| TopPlayer {
            player: players.get(&row.player_id).cloned(),
            player_id: row.player_id,
            total_bet: row.total_bet,
            count: row.count,
        })
        .collect())
}

/// Count rows of `table` created inside the window.
async fn count_in_range(
    pool: &PgPool,
    table: &'static str,
    range: &DateRange,
) -> Result<i64, AppError> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE {IN_RANGE}");
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
