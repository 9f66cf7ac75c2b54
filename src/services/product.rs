//! Vehicle catalog: listing, search, upload and maintenance of products.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{
    Product, ProductFilters, ProductInput, ProductSearch, UpdateProduct, ALLOWED_MAKES,
    ALLOWED_MODELS, MAX_YEAR, MIN_YEAR,
};
use crate::services::media::{MediaHost, UploadForm};

/// Cloudinary folder for product images.
const FOLDER: &str = "products";

/// Capitalize the first letter and lower-case the rest ("toYOTA" -> "Toyota").
pub fn normalize_case(value: &str) -> String {
    let value = value.trim();
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn normalize_make(make: &str) -> Result<String, AppError> {
    let make = normalize_case(make);
    if ALLOWED_MAKES.contains(&make.as_str()) {
        Ok(make)
    } else {
        Err(AppError::Validation(format!(
            "Invalid make '{make}'. Allowed: {}",
            ALLOWED_MAKES.join(", ")
        )))
    }
}

pub fn normalize_model(model: &str) -> Result<String, AppError> {
    let model = normalize_case(model);
    if ALLOWED_MODELS.contains(&model.as_str()) {
        Ok(model)
    } else {
        Err(AppError::Validation(format!(
            "Invalid model '{model}'. Allowed: {}",
            ALLOWED_MODELS.join(", ")
        )))
    }
}

pub fn check_year(year: i32) -> Result<i32, AppError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(AppError::Validation(format!(
            "Year must be between {MIN_YEAR} and {MAX_YEAR}"
        )))
    }
}

fn check_price(price: Option<f64>) -> Result<(), AppError> {
    match price {
        Some(p) if !p.is_finite() => Err(AppError::Validation("price must be a number".to_string())),
        Some(p) if p < 0.0 => Err(AppError::Validation("price cannot be negative".to_string())),
        _ => Ok(()),
    }
}

/// Normalize make and model, then check every catalog rule.
pub fn validate_input(input: ProductInput) -> Result<ProductInput, AppError> {
    if input.image_url.trim().is_empty() {
        return Err(AppError::Validation("imageUrl is required".to_string()));
    }
    check_price(input.price)?;

    Ok(ProductInput {
        make: normalize_make(&input.make)?,
        model: normalize_model(&input.model)?,
        year: check_year(input.year)?,
        ..input
    })
}

pub async fn create(pool: &PgPool, input: ProductInput) -> Result<Product, AppError> {
    let input = validate_input(input)?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, make, model, year, price, description, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.make)
    .bind(&input.model)
    .bind(input.year)
    .bind(input.price)
    .bind(&input.description)
    .bind(&input.image_url)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Create a product from the console's upload form.
///
/// Text fields are checked before the image is sent to the media host.
pub async fn upload(
    pool: &PgPool,
    media: &dyn MediaHost,
    form: UploadForm,
) -> Result<Product, AppError> {
    if form.file.is_none() {
        return Err(AppError::Validation("No image uploaded".to_string()));
    }

    let make = normalize_make(&form.required("make")?)?;
    let model = normalize_model(&form.required("model")?)?;
    let year = form
        .number("year")?
        .ok_or_else(|| AppError::Validation("year is required".to_string()))?;
    let year = check_year(year)?;
    let price = form.number::<f64>("price")?;
    let name = form.text("name");
    let description = form.text("description");

    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No image uploaded".to_string()))?;
    let image_url = media.upload(file, FOLDER).await?;

    let product = create(
        pool,
        ProductInput {
            name,
            make,
            model,
            year,
            price,
            description,
            image_url,
        },
    )
    .await?;

    tracing::info!(product_id = %product.id, make = %product.make, model = %product.model, "Product uploaded");
    Ok(product)
}

/// Storefront listing with exact-match filters, sort and pagination.
pub async fn list(
    pool: &PgPool,
    filters: &ProductFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Product>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.make.is_some() {
        param_index += 1;
        conditions.push(format!("make = ${param_index}"));
    }
    if filters.model.is_some() {
        param_index += 1;
        conditions.push(format!("model = ${param_index}"));
    }
    if filters.year.is_some() {
        param_index += 1;
        conditions.push(format!("year = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let order_by = filters
        .sort
        .map(|s| s.order_by())
        .unwrap_or("created_at ASC");

    let count_sql = format!("SELECT COUNT(*) FROM products {where_clause}");
    let data_sql = format!(
        "SELECT * FROM products {where_clause} ORDER BY {order_by} LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, Product>(&data_sql);

    // Bind parameters in the same order for both queries
    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(ref make) = filters.make {
        bind_both!(normalize_case(make));
    }
    if let Some(ref model) = filters.model {
        bind_both!(normalize_case(model));
    }
    if let Some(year) = filters.year {
        bind_both!(year);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Case-insensitive make/model substring search with an exact year.
pub async fn search(pool: &PgPool, query: &ProductSearch) -> Result<Vec<Product>, AppError> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR make ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR model ILIKE '%' || $2 || '%')
          AND ($3::int IS NULL OR year = $3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.make.as_deref().map(escape_like))
    .bind(query.model.as_deref().map(escape_like))
    .bind(query.year)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    value
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Product, AppError> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateProduct) -> Result<Product, AppError> {
    let make = input.make.as_deref().map(normalize_make).transpose()?;
    let model = input.model.as_deref().map(normalize_model).transpose()?;
    let year = input.year.map(check_year).transpose()?;
    if input.image_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
        return Err(AppError::Validation("imageUrl cannot be empty".to_string()));
    }
    check_price(input.price)?;

    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products SET
            name = COALESCE($2, name),
            make = COALESCE($3, make),
            model = COALESCE($4, model),
            year = COALESCE($5, year),
            price = COALESCE($6, price),
            description = COALESCE($7, description),
            image_url = COALESCE($8, image_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(make)
    .bind(model)
    .bind(year)
    .bind(input.price)
    .bind(&input.description)
    .bind(&input.image_url)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        ProductInput {
            name: Some("Side mirror".to_string()),
            make: "toyota".to_string(),
            model: "COROLLA".to_string(),
            year: 2015,
            price: Some(120.0),
            description: None,
            image_url: "https://res.cloudinary.com/demo/products/mirror.jpg".to_string(),
        }
    }

    #[test]
    fn case_is_normalized() {
        assert_eq!(normalize_case("xTRAIL"), "Xtrail");
        assert_eq!(normalize_case("  honda "), "Honda");
        assert_eq!(normalize_case(""), "");
    }

    #[test]
    fn valid_input_is_normalized() {
        let product = validate_input(input()).unwrap();
        assert_eq!(product.make, "Toyota");
        assert_eq!(product.model, "Corolla");
    }

    #[test]
    fn unknown_make_rejected() {
        let err = validate_input(ProductInput {
            make: "Ford".to_string(),
            ..input()
        })
        .unwrap_err();
        assert!(err.to_string().contains("Invalid make 'Ford'"));
    }

    #[test]
    fn unknown_model_rejected() {
        assert!(normalize_model("Focus").is_err());
        assert_eq!(normalize_model("lancer").unwrap(), "Lancer");
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(check_year(2001).is_ok());
        assert!(check_year(2025).is_ok());
        assert!(check_year(2000).is_err());
        assert!(check_year(2026).is_err());
    }

    #[test]
    fn missing_image_rejected() {
        let result = validate_input(ProductInput {
            image_url: " ".to_string(),
            ..input()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn price_must_be_finite_and_non_negative() {
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let result = validate_input(ProductInput {
                price: Some(bad),
                ..input()
            });
            assert!(matches!(result, Err(AppError::Validation(_))), "{bad} accepted");
        }
        assert!(check_price(None).is_ok());
        assert!(check_price(Some(0.0)).is_ok());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
