//! Key-value settings CRUD.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::setting::{CreateSetting, Setting, UpdateSetting};

pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, AppError> {
    let settings = sqlx::query_as::<_, Setting>("SELECT * FROM settings ORDER BY key ASC")
        .fetch_all(pool)
        .await?;
    Ok(settings)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Setting, AppError> {
    sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))
}

pub async fn create(pool: &PgPool, input: &CreateSetting) -> Result<Setting, AppError> {
    if input.value.is_null() {
        return Err(AppError::Validation("value is required".to_string()));
    }

    let setting = sqlx::query_as::<_, Setting>(
        r#"
        INSERT INTO settings (key, value, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&input.key)
    .bind(&input.value)
    .bind(&input.description)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_unique(e, format!("Setting '{}' already exists", input.key)))?;

    tracing::info!(key = %setting.key, "Setting created");
    Ok(setting)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateSetting) -> Result<Setting, AppError> {
    sqlx::query_as::<_, Setting>(
        r#"
        UPDATE settings SET
            key = COALESCE($2, key),
            value = COALESCE($3, value),
            description = COALESCE($4, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.key)
    .bind(&input.value)
    .bind(&input.description)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from_unique(e, "Setting key already exists"))?
    .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM settings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Setting not found".to_string()));
    }
    Ok(())
}
