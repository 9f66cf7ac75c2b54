//! Payout model: a disbursement of winnings to a player, reviewed by the admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::player::Player;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payout_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: Uuid,
    pub player_id: Uuid,
    pub amount: f64,
    pub status: PayoutStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payout with its player record attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutDetail {
    #[serde(flatten)]
    pub payout: Payout,
    pub player: Option<Player>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayout {
    #[serde(alias = "player")]
    pub player_id: Uuid,
    #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
    pub amount: f64,
    pub status: Option<PayoutStatus>,
    pub requested_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayout {
    #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
    pub amount: Option<f64>,
    pub status: Option<PayoutStatus>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payout_status_round_trip() {
        let json = serde_json::to_string(&PayoutStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        let parsed: PayoutStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PayoutStatus::Approved);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<PayoutStatus>("\"completed\"").is_err());
    }
}
