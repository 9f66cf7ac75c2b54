//! Flight plan: a named template or category flights can belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FlightPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlightPlan {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlightPlan {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_flight_plan_from_console_payload() {
        let plan: CreateFlightPlan =
            serde_json::from_str(r#"{"name":"Morning Session","isActive":true}"#).unwrap();
        assert_eq!(plan.name, "Morning Session");
        assert_eq!(plan.is_active, Some(true));
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn empty_name_is_invalid() {
        let plan = CreateFlightPlan {
            name: String::new(),
            description: None,
            is_active: None,
        };
        assert!(plan.validate().is_err());
    }
}
