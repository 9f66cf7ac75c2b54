//! Marketplace blog post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlog {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "body is required"))]
    pub body: String,
    pub author: Option<String>,
    #[validate(url(message = "imageUrl must be a URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlog {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "body cannot be empty"))]
    pub body: Option<String>,
    pub author: Option<String>,
    #[validate(url(message = "imageUrl must be a URL"))]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_must_be_a_url() {
        let blog = CreateBlog {
            title: "New arrivals".to_string(),
            body: "Fresh Demio mirrors in stock.".to_string(),
            author: None,
            image_url: Some("not a url".to_string()),
        };
        assert!(blog.validate().is_err());
    }
}
