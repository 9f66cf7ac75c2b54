//! Flat key-value configuration store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSetting {
    #[validate(length(min = 1, message = "key is required"))]
    pub key: String,
    /// A missing `value` deserializes as JSON null and is rejected by the service.
    #[serde(default)]
    pub value: serde_json::Value,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSetting {
    #[validate(length(min = 1, message = "key cannot be empty"))]
    pub key: Option<String>,
    pub value: Option<serde_json::Value>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_value_accepts_any_json() {
        let s: CreateSetting =
            serde_json::from_str(r#"{"key":"limits","value":{"maxBet":5000,"enabled":true}}"#)
                .unwrap();
        assert_eq!(s.value["maxBet"], 5000);
    }

    #[test]
    fn missing_value_is_null() {
        let s: CreateSetting = serde_json::from_str(r#"{"key":"empty"}"#).unwrap();
        assert!(s.value.is_null());
    }
}
