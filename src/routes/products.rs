//! Vehicle catalog routes: storefront listing and search, admin upload,
//! CSV/XLSX import and maintenance.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::{Ack, ApiResponse, AppError};
use crate::middleware::auth::CurrentAdmin;
use crate::middleware::extract::{read_upload_form, ApiPath, ApiQuery, ValidatedJson};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{Product, ProductFilters, ProductSearch, UpdateProduct, UploadedProduct};
use crate::services::import::{self as import_service, ImportFormat, ImportResult};
use crate::services::product as product_service;
use crate::AppState;

/// GET /products: public listing with make/model/year filters.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<Pagination>,
    ApiQuery(filters): ApiQuery<ProductFilters>,
) -> Result<Json<ApiResponse<PagedResult<Product>>>, AppError> {
    let result = product_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/products/search
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductSearch>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = product_service::search(&state.db, &query).await?;
    Ok(ApiResponse::success(products))
}

/// POST /upload: multipart `image` plus make, model, year.
pub async fn upload(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadedProduct>>), AppError> {
    let form = read_upload_form(multipart, "image").await?;
    let product = product_service::upload(&state.db, state.media.as_ref(), form).await?;
    Ok(ApiResponse::created(UploadedProduct {
        message: "Uploaded successfully".to_string(),
        product,
    }))
}

/// POST /upload-products-csv: multipart `file` (CSV or XLSX).
pub async fn import_csv(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ImportResult>>, AppError> {
    let form = read_upload_form(multipart, "file").await?;
    let file = form.file.ok_or_else(|| {
        AppError::Validation("Missing 'file' field in multipart request".to_string())
    })?;

    let format = ImportFormat::from_filename(Some(file.file_name.as_str()));
    let result = import_service::import_products(&state.db, &file.bytes, format).await?;
    Ok(ApiResponse::success(result))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateProduct>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = product_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Ack>>, AppError> {
    product_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Ack::new("Product deleted")))
}
