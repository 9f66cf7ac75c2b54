//! Authentication service: password hashing, JWT, registration and login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::admin::{Admin, AdminResponse, Credentials};

/// JWT claims embedded in the bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub admin_id: String,
    pub exp: i64,
    pub iat: i64,
}

/// Login response: the bearer token plus the admin it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminResponse,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Sign a bearer token for the admin.
pub fn generate_token(admin: &Admin, jwt_secret: &str, expiry_secs: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: admin.username.clone(),
        admin_id: admin.id.to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Register the console's single admin.
///
/// The `admins_singleton` index rejects a second row, so concurrent
/// registrations that both pass the emptiness check still yield one admin.
pub async fn register(pool: &PgPool, input: &Credentials) -> Result<AdminResponse, AppError> {
    let password_hash = hash_password(&input.password)?;

    let admin = sqlx::query_as::<_, Admin>(
        r#"
        INSERT INTO admins (username, password_hash)
        SELECT $1, $2
        WHERE NOT EXISTS (SELECT 1 FROM admins)
        RETURNING *
        "#,
    )
    .bind(&input.username)
    .bind(&password_hash)
    .fetch_optional(pool)
    .await
    .map_err(registration_closed_on_conflict)?
    .ok_or_else(registration_closed)?;

    tracing::info!(admin = %admin.username, "Admin registered");
    Ok(AdminResponse::from(admin))
}

fn registration_closed() -> AppError {
    AppError::Forbidden("Registration is closed. Admin already exists.".to_string())
}

fn registration_closed_on_conflict(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => registration_closed(),
        other => AppError::Database(other),
    }
}

/// Authenticate the admin by username and password.
pub async fn login(
    pool: &PgPool,
    input: &Credentials,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<LoginResponse, AppError> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
        .bind(&input.username)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&input.password, &admin.password_hash)? {
        tracing::warn!(admin = %admin.username, "Rejected login: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = generate_token(&admin, jwt_secret, expiry_secs)?;
    Ok(LoginResponse {
        token,
        user: AdminResponse::from(admin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn admin() -> Admin {
        Admin {
            id: Uuid::new_v4(),
            username: "ops".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_and_verify() {
        let password = "SecurePassword123!";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn token_generation_and_validation() {
        let admin = admin();
        let secret = "test-secret-key-for-jwt";
        let token = generate_token(&admin, secret, 86_400).unwrap();

        let claims = validate_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "ops");
        assert_eq!(claims.admin_id, admin.id.to_string());
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let token = generate_token(&admin(), "one-secret", 60).unwrap();
        assert!(matches!(
            validate_token(&token, "another-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn invalid_token_rejected() {
        let result = validate_token("garbage.token.here", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn non_unique_database_errors_pass_through() {
        assert!(matches!(
            registration_closed_on_conflict(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
        assert!(matches!(registration_closed(), AppError::Forbidden(_)));
    }

    #[test]
    fn expired_token_rejected() {
        let secret = "test-secret";
        // Expired well beyond the 60s leeway window
        let token = generate_token(&admin(), secret, -3600).unwrap();
        assert!(validate_token(&token, secret).is_err());
    }
}
