//! Vehicle catalog product for the parts marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Makes the catalog accepts, in their canonical capitalization.
pub const ALLOWED_MAKES: [&str; 6] = ["Toyota", "Honda", "Nissan", "Mazda", "Subaru", "Mitsubishi"];

/// Models the catalog accepts, in their canonical capitalization.
pub const ALLOWED_MODELS: [&str; 6] = ["Corolla", "Civic", "Xtrail", "Demio", "Forester", "Lancer"];

pub const MIN_YEAR: i32 = 2001;
pub const MAX_YEAR: i32 = 2025;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product fields collected from a multipart upload or an import row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    pub name: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: String,
}

/// Catalog rules (make, model, year) are checked by the product service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub description: Option<String>,
    #[validate(url(message = "imageUrl must be a URL"))]
    pub image_url: Option<String>,
}

/// Sort orders offered by the storefront listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Newest,
    Oldest,
    YearAsc,
    YearDesc,
}

impl ProductSort {
    pub fn order_by(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC",
            Self::Oldest => "created_at ASC",
            Self::YearAsc => "year ASC, created_at ASC",
            Self::YearDesc => "year DESC, created_at ASC",
        }
    }
}

/// Exact-match filters for the storefront listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilters {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub sort: Option<ProductSort>,
}

/// Case-insensitive search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSearch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedProduct {
    pub message: String,
    pub product: Product,
}
