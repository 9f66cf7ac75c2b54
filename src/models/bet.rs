//! Bet model: a player's stake on a flight, settled as win or lose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::flight::Flight;
use crate::models::player::Player;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash,
)]
#[sqlx(type_name = "bet_result", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    Win,
    Lose,
    #[default]
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: Uuid,
    pub player_id: Uuid,
    pub flight_id: Option<Uuid>,
    pub amount: f64,
    pub odds: f64,
    pub result: BetResult,
    pub payout: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bet with its player and flight records attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetDetail {
    #[serde(flatten)]
    pub bet: Bet,
    pub player: Option<Player>,
    pub flight: Option<Flight>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBet {
    #[serde(alias = "player")]
    pub player_id: Uuid,
    #[serde(alias = "flight")]
    pub flight_id: Option<Uuid>,
    #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
    pub amount: f64,
    #[validate(range(exclusive_min = 0.0, message = "odds must be positive"))]
    pub odds: f64,
    pub result: Option<BetResult>,
    #[validate(range(min = 0.0, message = "payout cannot be negative"))]
    pub payout: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBet {
    #[serde(alias = "player")]
    pub player_id: Option<Uuid>,
    #[serde(alias = "flight")]
    pub flight_id: Option<Uuid>,
    #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
    pub amount: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "odds must be positive"))]
    pub odds: Option<f64>,
    pub result: Option<BetResult>,
    #[validate(range(min = 0.0, message = "payout cannot be negative"))]
    pub payout: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_result_wire_format() {
        assert_eq!(serde_json::to_string(&BetResult::Win).unwrap(), "\"win\"");
        let parsed: BetResult = serde_json::from_str("\"lose\"").unwrap();
        assert_eq!(parsed, BetResult::Lose);
        assert_eq!(BetResult::default(), BetResult::Pending);
    }

    #[test]
    fn create_bet_accepts_player_alias() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"player":"{id}","amount":500,"odds":2.5}}"#);
        let bet: CreateBet = serde_json::from_str(&body).unwrap();
        assert_eq!(bet.player_id, id);
        assert!(bet.result.is_none());
        assert!(bet.validate().is_ok());
    }

    #[test]
    fn create_bet_rejects_non_positive_amount() {
        let bet = CreateBet {
            player_id: Uuid::nil(),
            flight_id: None,
            amount: 0.0,
            odds: 2.0,
            result: None,
            payout: None,
        };
        assert!(bet.validate().is_err());
    }

    #[test]
    fn bet_detail_flattens_bet_fields() {
        let now = Utc::now();
        let detail = BetDetail {
            bet: Bet {
                id: Uuid::nil(),
                player_id: Uuid::nil(),
                flight_id: None,
                amount: 100.0,
                odds: 1.5,
                result: BetResult::Pending,
                payout: 0.0,
                created_at: now,
                updated_at: now,
            },
            player: None,
            flight: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["amount"], 100.0);
        assert_eq!(json["playerId"], Uuid::nil().to_string());
        assert!(json["player"].is_null());
    }
}
