//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env). Each
//! section is skipped when its table already has rows.

use anyhow::Context;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use aviator_admin::models::bet::BetResult;
use aviator_admin::models::payout::PayoutStatus;
use aviator_admin::models::product::ProductInput;
use aviator_admin::services::{auth, bet, product};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "Admin123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = aviator_admin::db::create_pool(&db_url, 5).await?;
    aviator_admin::db::migrate(&pool).await?;

    println!("=== Aviator Admin Seed Script ===");

    seed_admin(&pool).await?;
    let players = seed_players(&pool).await?;
    let flights = seed_flights(&pool).await?;
    seed_bets(&pool, &players, &flights).await?;
    seed_payouts(&pool, &players).await?;
    seed_settings(&pool).await?;
    seed_products(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_USERNAME} / {ADMIN_PASSWORD}");

    Ok(())
}

async fn table_is_empty(pool: &PgPool, table: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

async fn seed_admin(pool: &PgPool) -> anyhow::Result<()> {
    if !table_is_empty(pool, "admins").await? {
        println!("[skip] Admin already exists");
        return Ok(());
    }

    let hash = auth::hash_password(ADMIN_PASSWORD)?;
    sqlx::query("INSERT INTO admins (username, password_hash) VALUES ($1, $2)")
        .bind(ADMIN_USERNAME)
        .bind(&hash)
        .execute(pool)
        .await?;

    println!("[done] Created admin user");
    Ok(())
}

async fn seed_players(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    if table_is_empty(pool, "players").await? {
        let players = [
            ("skyrunner", 1500.0, "active"),
            ("highroller", 12000.0, "active"),
            ("cashout_kid", 80.5, "active"),
            ("pilot_pete", 430.0, "active"),
            ("lucky_lena", 2750.0, "active"),
            ("stormchaser", 0.0, "banned"),
        ];

        for (username, balance, status) in players {
            sqlx::query(
                "INSERT INTO players (username, email, balance, status)
                 VALUES ($1, $2, $3, $4::player_status)",
            )
            .bind(username)
            .bind(format!("{username}@example.com"))
            .bind(balance)
            .bind(status)
            .execute(pool)
            .await?;
        }
        println!("[done] Created {} players", players.len());
    } else {
        println!("[skip] Players already exist");
    }

    let ids = sqlx::query_scalar("SELECT id FROM players ORDER BY username")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Returns `(flight_id, multiplier)` pairs.
async fn seed_flights(pool: &PgPool) -> anyhow::Result<Vec<(Uuid, f64)>> {
    if table_is_empty(pool, "flight_plans").await? {
        let plans = [
            ("Morning Session", "Low-volatility rounds before noon", true),
            ("Evening Rush", "Peak-hour rounds", true),
            ("Legacy Schedule", "Retired plan kept for history", false),
        ];
        for (name, description, is_active) in plans {
            sqlx::query("INSERT INTO flight_plans (name, description, is_active) VALUES ($1, $2, $3)")
                .bind(name)
                .bind(description)
                .bind(is_active)
                .execute(pool)
                .await?;
        }
        println!("[done] Created {} flight plans", plans.len());
    }

    if table_is_empty(pool, "flights").await? {
        let plan_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM flight_plans WHERE is_active ORDER BY name")
                .fetch_all(pool)
                .await?;

        let multipliers = [1.24, 3.87, 1.02, 7.45, 2.10, 15.3, 1.66, 4.01];
        let now = Utc::now();
        for (i, multiplier) in multipliers.iter().enumerate() {
            let start = now - Duration::hours(i as i64 * 7);
            // every fourth flight is unscheduled and stays out of flight history
            let plan = if i % 4 == 3 {
                None
            } else {
                plan_ids.get(i % plan_ids.len().max(1)).copied()
            };
            sqlx::query(
                "INSERT INTO flights (flight_number, start_time, end_time, result, multiplier, players, flight_plan_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(format!("AV-{}", 1000 + i))
            .bind(start)
            .bind(start + Duration::seconds(20 + (*multiplier * 4.0) as i64))
            .bind(format!("crashed at {multiplier:.2}x"))
            .bind(multiplier)
            .bind(12 + (i as i32 * 9) % 40)
            .bind(plan)
            .execute(pool)
            .await?;
        }
        println!("[done] Created {} flights", multipliers.len());
    } else {
        println!("[skip] Flights already exist");
    }

    let rows: Vec<(Uuid, f64)> =
        sqlx::query_as("SELECT id, multiplier FROM flights ORDER BY start_time DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

async fn seed_bets(
    pool: &PgPool,
    players: &[Uuid],
    flights: &[(Uuid, f64)],
) -> anyhow::Result<()> {
    if !table_is_empty(pool, "bets").await? {
        println!("[skip] Bets already exist");
        return Ok(());
    }
    if players.is_empty() || flights.is_empty() {
        println!("[skip] No players or flights to bet on");
        return Ok(());
    }

    let amounts = [500.0, 1000.0, 50.0, 250.0, 75.0, 2000.0, 120.0, 40.0, 900.0, 310.0];
    let cashouts = [1.5, 2.0, 1.1, 3.0, 5.0];
    let now = Utc::now();
    let mut created = 0;

    for (i, amount) in amounts.iter().enumerate() {
        let player_id = players[i % players.len()];
        let (flight_id, crash) = flights[i % flights.len()];
        let odds = cashouts[i % cashouts.len()];
        let result = if i == amounts.len() - 1 {
            BetResult::Pending
        } else if odds <= crash {
            BetResult::Win
        } else {
            BetResult::Lose
        };
        let payout = bet::settle(*amount, odds, result, None)?;

        sqlx::query(
            "INSERT INTO bets (player_id, flight_id, amount, odds, result, payout, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)",
        )
        .bind(player_id)
        .bind(flight_id)
        .bind(amount)
        .bind(odds)
        .bind(result)
        .bind(payout)
        .bind(now - Duration::hours(i as i64 * 5))
        .execute(pool)
        .await?;
        created += 1;
    }

    println!("[done] Created {created} bets");
    Ok(())
}

async fn seed_payouts(pool: &PgPool, players: &[Uuid]) -> anyhow::Result<()> {
    if !table_is_empty(pool, "payouts").await? {
        println!("[skip] Payouts already exist");
        return Ok(());
    }
    if players.is_empty() {
        return Ok(());
    }

    let payouts = [
        (1250.0, PayoutStatus::Approved),
        (300.0, PayoutStatus::Pending),
        (75.0, PayoutStatus::Rejected),
        (980.0, PayoutStatus::Pending),
    ];
    let now = Utc::now();

    for (i, (amount, status)) in payouts.iter().enumerate() {
        let requested_at = now - Duration::days(i as i64);
        let processed_at = (*status != PayoutStatus::Pending).then(|| requested_at + Duration::hours(2));
        sqlx::query(
            "INSERT INTO payouts (player_id, amount, status, requested_at, processed_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(players[i % players.len()])
        .bind(amount)
        .bind(status)
        .bind(requested_at)
        .bind(processed_at)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} payouts", payouts.len());
    Ok(())
}

async fn seed_settings(pool: &PgPool) -> anyhow::Result<()> {
    let settings = [
        ("maxBet", serde_json::json!(5000), "Largest single wager accepted"),
        ("minBet", serde_json::json!(1), "Smallest single wager accepted"),
        ("maintenanceMode", serde_json::json!(false), "Pause new rounds"),
        (
            "payoutLimits",
            serde_json::json!({"daily": 20000, "perRequest": 5000}),
            "Withdrawal caps",
        ),
    ];

    for (key, value, description) in &settings {
        sqlx::query(
            "INSERT INTO settings (key, value, description) VALUES ($1, $2, $3)
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(pool)
        .await?;
    }

    println!("[done] Seeded {} settings", settings.len());
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<()> {
    if !table_is_empty(pool, "products").await? {
        println!("[skip] Products already exist");
        return Ok(());
    }

    let products = [
        ("Toyota", "Corolla", 2018, 12500.0),
        ("Honda", "Civic", 2020, 15800.0),
        ("Nissan", "Xtrail", 2015, 11200.0),
        ("Mazda", "Demio", 2012, 6400.0),
        ("Subaru", "Forester", 2021, 24900.0),
        ("Mitsubishi", "Lancer", 2009, 5300.0),
    ];

    for (make, model, year, price) in products {
        product::create(
            pool,
            ProductInput {
                name: Some(format!("{year} {make} {model}")),
                make: make.to_string(),
                model: model.to_string(),
                year,
                price: Some(price),
                description: Some(format!("Well-kept {make} {model}")),
                image_url: format!(
                    "https://res.cloudinary.com/demo/image/upload/products/{}.jpg",
                    model.to_lowercase()
                ),
            },
        )
        .await?;
    }

    println!("[done] Created {} products", products.len());
    Ok(())
}
