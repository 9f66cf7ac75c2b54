//! Flight ("round") model: one completed round of the game and its multiplier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::flight_plan::FlightPlan;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub multiplier: f64,
    pub players: i32,
    pub flight_plan_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flight with its flight plan attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetail {
    #[serde(flatten)]
    pub flight: Flight,
    pub flight_plan: Option<FlightPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlight {
    #[validate(length(min = 1, message = "flightNumber is required"))]
    pub flight_number: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    /// Optional at the serde layer so a missing value gets a precise message.
    #[validate(range(min = 0.0, message = "multiplier cannot be negative"))]
    pub multiplier: Option<f64>,
    #[validate(range(min = 0, message = "players cannot be negative"))]
    pub players: Option<i32>,
    #[serde(alias = "flightPlan")]
    pub flight_plan_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlight {
    #[validate(length(min = 1, message = "flightNumber cannot be empty"))]
    pub flight_number: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    #[validate(range(min = 0.0, message = "multiplier cannot be negative"))]
    pub multiplier: Option<f64>,
    #[validate(range(min = 0, message = "players cannot be negative"))]
    pub players: Option<i32>,
    #[serde(alias = "flightPlan")]
    pub flight_plan_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_flight_accepts_flight_plan_alias() {
        let plan = Uuid::new_v4();
        let body = format!(
            r#"{{"flightNumber":"AV-1234","startTime":"2024-06-15T14:30:00Z","multiplier":2.5,"flightPlan":"{plan}"}}"#
        );
        let flight: CreateFlight = serde_json::from_str(&body).unwrap();
        assert_eq!(flight.flight_plan_id, Some(plan));
        assert_eq!(flight.multiplier, Some(2.5));
    }

    #[test]
    fn missing_multiplier_deserializes_as_none() {
        let flight: CreateFlight = serde_json::from_str(
            r#"{"flightNumber":"AV-1","startTime":"2024-06-15T14:30:00Z"}"#,
        )
        .unwrap();
        assert!(flight.multiplier.is_none());
    }
}
