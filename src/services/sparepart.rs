//! Spare part listings. Writes arrive as multipart forms whose image is either
//! an uploaded file or a ready-made `image` URL.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::extract::describe;
use crate::models::sparepart::{CreateSparepart, Sparepart, UpdateSparepart};
use crate::services::media::{MediaHost, UploadForm};

/// Cloudinary folder for spare part images.
const FOLDER: &str = "spareparts";

/// Build a validated create payload from the form's text fields.
pub fn to_create(form: &UploadForm) -> Result<CreateSparepart, AppError> {
    let input = CreateSparepart {
        name: form.required("name")?,
        brand: form.required("brand")?,
        price: form
            .number("price")?
            .ok_or_else(|| AppError::Validation("price is required".to_string()))?,
        stock: form
            .number("stock")?
            .ok_or_else(|| AppError::Validation("stock is required".to_string()))?,
        description: form.required("description")?,
        category: form.required("category")?,
        image: form.text("image"),
    };
    input
        .validate()
        .map_err(|e| AppError::Validation(describe(&e)))?;
    Ok(input)
}

/// Build a validated partial update from the form's text fields.
pub fn to_update(form: &UploadForm) -> Result<UpdateSparepart, AppError> {
    let input = UpdateSparepart {
        name: form.text("name"),
        brand: form.text("brand"),
        price: form.number("price")?,
        stock: form.number("stock")?,
        description: form.text("description"),
        category: form.text("category"),
        image: form.text("image"),
    };
    input
        .validate()
        .map_err(|e| AppError::Validation(describe(&e)))?;
    Ok(input)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Sparepart>, AppError> {
    let parts = sqlx::query_as::<_, Sparepart>("SELECT * FROM spareparts ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(parts)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Sparepart, AppError> {
    sqlx::query_as::<_, Sparepart>("SELECT * FROM spareparts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Spare part not found".to_string()))
}

pub async fn create(
    pool: &PgPool,
    media: &dyn MediaHost,
    form: UploadForm,
) -> Result<Sparepart, AppError> {
    let mut input = to_create(&form)?;
    if let Some(file) = form.file {
        input.image = Some(media.upload(file, FOLDER).await?);
    }

    let part = sqlx::query_as::<_, Sparepart>(
        r#"
        INSERT INTO spareparts (name, brand, price, stock, description, category, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.brand)
    .bind(input.price)
    .bind(input.stock)
    .bind(&input.description)
    .bind(&input.category)
    .bind(&input.image)
    .fetch_one(pool)
    .await?;

    tracing::info!(sparepart_id = %part.id, name = %part.name, "Spare part created");
    Ok(part)
}

pub async fn update(
    pool: &PgPool,
    media: &dyn MediaHost,
    id: Uuid,
    form: UploadForm,
) -> Result<Sparepart, AppError> {
    let mut input = to_update(&form)?;
    // 404 before spending an upload
    find_by_id(pool, id).await?;
    if let Some(file) = form.file {
        input.image = Some(media.upload(file, FOLDER).await?);
    }

    sqlx::query_as::<_, Sparepart>(
        r#"
        UPDATE spareparts SET
            name = COALESCE($2, name),
            brand = COALESCE($3, brand),
            price = COALESCE($4, price),
            stock = COALESCE($5, stock),
            description = COALESCE($6, description),
            category = COALESCE($7, category),
            image = COALESCE($8, image),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.brand)
    .bind(input.price)
    .bind(input.stock)
    .bind(&input.description)
    .bind(&input.category)
    .bind(&input.image)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Spare part not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM spareparts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Spare part not found".to_string()));
    }
    Ok(())
}
