//! Marketplace blog posts.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::blog::{Blog, CreateBlog, UpdateBlog};

pub async fn list(pool: &PgPool) -> Result<Vec<Blog>, AppError> {
    let blogs = sqlx::query_as::<_, Blog>("SELECT * FROM blogs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(blogs)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Blog, AppError> {
    sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))
}

pub async fn create(pool: &PgPool, input: &CreateBlog) -> Result<Blog, AppError> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (title, body, author, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&input.title)
    .bind(&input.body)
    .bind(&input.author)
    .bind(&input.image_url)
    .fetch_one(pool)
    .await?;
    Ok(blog)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateBlog) -> Result<Blog, AppError> {
    sqlx::query_as::<_, Blog>(
        r#"
        UPDATE blogs SET
            title = COALESCE($2, title),
            body = COALESCE($3, body),
            author = COALESCE($4, author),
            image_url = COALESCE($5, image_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.body)
    .bind(&input.author)
    .bind(&input.image_url)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Blog not found".to_string()));
    }
    Ok(())
}
