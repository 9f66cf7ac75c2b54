//! Spare part listing for the parts marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sparepart {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CreateSparepart {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "brand is required"))]
    pub brand: String,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: i32,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateSparepart {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "brand cannot be empty"))]
    pub brand: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SparepartCreated {
    pub message: String,
    pub part: Sparepart,
}

#[derive(Debug, Clone, Serialize)]
pub struct SparepartUpdated {
    pub message: String,
    pub sparepart: Sparepart,
}
