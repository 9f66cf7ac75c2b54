//! Blog routes. Reads are public.

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{ApiPath, ValidatedJson};
use crate::models::blog::{Blog, CreateBlog, UpdateBlog};
use crate::services::blog as blog_service;
use crate::AppState;

/// GET /api/blogs
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Blog>>>, AppError> {
    let blogs = blog_service::list(&state.db).await?;
    Ok(ApiResponse::success(blogs))
}

/// GET /api/blogs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Blog>>, AppError> {
    let blog = blog_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(blog))
}

/// POST /api/blogs
pub async fn create(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(body): ValidatedJson<CreateBlog>,
) -> Result<(StatusCode, Json<ApiResponse<Blog>>), AppError> {
    let blog = blog_service::create(&state.db, &body).await?;
    Ok(ApiResponse::created(blog))
}

/// PUT /api/blogs/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateBlog>,
) -> Result<Json<ApiResponse<Blog>>, AppError> {
    let blog = blog_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(blog))
}

/// DELETE /api/blogs/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    blog_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Blog deleted")))
}
