//! Admin account model. The console has a single administrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Full admin row from database (includes password_hash; never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Admin response DTO without password_hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<Admin> for AdminResponse {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            username: a.username,
        }
    }
}

/// Registration and login credentials.
///
/// The console's login form posts the identifier as `email`; it is accepted as
/// an alias for `username`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[serde(alias = "email")]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_response_excludes_password() {
        let admin = Admin {
            id: Uuid::nil(),
            username: "root".to_string(),
            password_hash: "secret_hash".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&AdminResponse::from(admin)).unwrap();
        assert!(json.contains("root"));
        assert!(!json.contains("password"));
        assert!(!json.contains("secret_hash"));
    }

    #[test]
    fn credentials_accept_email_alias() {
        let creds: Credentials =
            serde_json::from_str(r#"{"email":"ops","password":"pw"}"#).unwrap();
        assert_eq!(creds.username, "ops");
    }

    #[test]
    fn empty_credentials_fail_validation() {
        let creds = Credentials {
            username: String::new(),
            password: "pw".to_string(),
        };
        assert!(creds.validate().is_err());
    }
}
