//! Bulk product import from CSV or XLSX uploads.
//!
//! The header row is checked up front and a missing required column rejects
//! the whole file. After that every row is validated and inserted on its own;
//! bad rows are skipped and reported back.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::product::ProductInput;
use crate::services::product;

/// Columns every import file must carry (after trimming and lower-casing).
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "make", "model", "year", "price"];

/// Accepted spellings of the image column.
const IMAGE_COLUMNS: [&str; 3] = ["imageurl", "image_url", "image"];

type Row = HashMap<String, String>;

/// A data row paired with its 1-based line in the source file.
type NumberedRow = (usize, Row);

/// Result of an import run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub created_count: usize,
    pub total_received: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Why a single row was skipped. `row` is the 1-based line in the file.
#[derive(Debug, Serialize)]
pub struct ImportError {
    pub row: usize,
    pub message: String,
}

/// Import file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// Detect format from filename extension, defaulting to CSV.
    pub fn from_filename(filename: Option<&str>) -> Self {
        match filename.map(str::to_lowercase) {
            Some(name) if name.ends_with(".xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }
}

/// Parse, check and insert products from an uploaded file.
pub async fn import_products(
    pool: &PgPool,
    data: &[u8],
    format: ImportFormat,
) -> Result<ImportResult, AppError> {
    let (headers, rows) = match format {
        ImportFormat::Csv => parse_csv(data)?,
        ImportFormat::Xlsx => parse_xlsx(data)?,
    };
    check_columns(&headers)?;

    let mut created_count = 0usize;
    let mut errors = Vec::new();

    for (line, row) in &rows {
        let line = *line;
        let input = match row_to_input(row) {
            Ok(input) => input,
            Err(message) => {
                errors.push(ImportError { row: line, message });
                continue;
            }
        };

        match product::create(pool, input).await {
            Ok(_) => created_count += 1,
            Err(AppError::Validation(message)) => errors.push(ImportError { row: line, message }),
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        created = created_count,
        received = rows.len(),
        skipped = errors.len(),
        "Product import finished"
    );

    Ok(ImportResult {
        created_count,
        total_received: rows.len(),
        skipped: errors.len(),
        errors,
    })
}

/// Reject the file when any required column is absent.
pub fn check_columns(headers: &[String]) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "CSV missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Turn one row into a product candidate; catalog rules are checked on insert.
pub fn row_to_input(row: &Row) -> Result<ProductInput, String> {
    let get = |col: &str| -> Option<String> {
        row.get(col)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let require = |col: &str| get(col).ok_or_else(|| format!("Missing {col}"));

    let name = require("name")?;
    let make = require("make")?;
    let model = require("model")?;

    let year_raw = require("year")?;
    let year = parse_year(&year_raw).ok_or_else(|| format!("Invalid year '{year_raw}'"))?;

    let price_raw = require("price")?;
    let price = price_raw
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| format!("Invalid price '{price_raw}'"))?;

    let image_url = IMAGE_COLUMNS
        .into_iter()
        .find_map(|col| get(col))
        .ok_or_else(|| "Missing imageUrl".to_string())?;

    Ok(ProductInput {
        name: Some(name),
        make,
        model,
        year,
        price: Some(price),
        description: get("description"),
        image_url,
    })
}

/// Years may arrive as "2015" or, from spreadsheets, "2015.0".
fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value: f64 = raw.parse().ok()?;
    (value.fract() == 0.0 && value.abs() < f64::from(i32::MAX)).then_some(value as i32)
}

fn is_blank(row: &Row) -> bool {
    row.values().all(|v| v.trim().is_empty())
}

/// Parse CSV data into normalized headers and numbered header→value maps.
fn parse_csv(data: &[u8]) -> Result<(Vec<String>, Vec<NumberedRow>), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Invalid CSV headers: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::Validation(format!("CSV parse error: {e}")))?;
        let line = record.position().map_or(0, |pos| pos.line() as usize);
        let mut map = Row::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                map.insert(header.clone(), value.to_string());
            }
        }
        if !is_blank(&map) {
            rows.push((line, map));
        }
    }
    Ok((headers, rows))
}

/// Parse the first XLSX sheet into normalized headers and numbered header→value maps.
fn parse_xlsx(data: &[u8]) -> Result<(Vec<String>, Vec<NumberedRow>), AppError> {
    let cursor = Cursor::new(data);
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| AppError::Validation(format!("Invalid XLSX file: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Validation("XLSX file has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::Validation(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    let first_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut row_iter = range.rows();

    let header_row = row_iter
        .next()
        .ok_or_else(|| AppError::Validation("XLSX sheet is empty".to_string()))?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| normalize_header(&cell.to_string()))
        .collect();

    let mut rows = Vec::new();
    for (offset, row) in row_iter.enumerate() {
        let mut map = Row::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).map(|cell| cell.to_string()).unwrap_or_default();
            map.insert(header.clone(), value);
        }
        if !is_blank(&map) {
            rows.push((first_line + 1 + offset, map));
        }
    }

    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_lowercased() {
        let data = b" Name ,MAKE,Model,Year,Price,ImageUrl\nMirror,toyota,corolla,2015,120,https://img/x.jpg\n";
        let (headers, rows) = parse_csv(data).unwrap();
        assert_eq!(headers, vec!["name", "make", "model", "year", "price", "imageurl"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1["make"], "toyota");
    }

    #[test]
    fn missing_price_column_rejects_whole_file() {
        let data = b"name,make,model,year\nMirror,Toyota,Corolla,2015\n";
        let (headers, _) = parse_csv(data).unwrap();
        let err = check_columns(&headers).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "CSV missing required fields: price");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn every_missing_column_is_named() {
        let headers = vec!["make".to_string()];
        let err = check_columns(&headers).unwrap_err();
        assert!(err.to_string().ends_with("name, model, year, price"));
    }

    #[test]
    fn blank_lines_are_not_rows() {
        let data = b"name,make,model,year,price\n,,,,\nMirror,Toyota,Corolla,2015,120\n";
        let (_, rows) = parse_csv(data).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn rows_keep_their_file_line_after_blank_lines() {
        let data = b"name,make,model,year,price\nA,Toyota,Corolla,2015,1\n,,,,\n,,,,\nB,Honda,Civic,2018,2\n";
        let (_, rows) = parse_csv(data).unwrap();
        let lines: Vec<usize> = rows.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![2, 5]);
        assert_eq!(rows[1].1["name"], "B");
    }

    #[test]
    fn non_finite_price_is_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let row: Row = [
                ("name", "Mirror"),
                ("make", "Honda"),
                ("model", "Civic"),
                ("year", "2018"),
                ("price", raw),
                ("imageurl", "https://img/civic.jpg"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
            assert_eq!(row_to_input(&row).unwrap_err(), format!("Invalid price '{raw}'"));
        }
    }

    #[test]
    fn row_converts_to_input() {
        let row: Row = [
            ("name", "Mirror"),
            ("make", "honda"),
            ("model", "civic"),
            ("year", "2018.0"),
            ("price", "85.5"),
            ("image", "https://img/civic.jpg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let input = row_to_input(&row).unwrap();
        assert_eq!(input.year, 2018);
        assert_eq!(input.price, Some(85.5));
        assert_eq!(input.image_url, "https://img/civic.jpg");
        assert!(input.description.is_none());
    }

    #[test]
    fn row_problems_are_described() {
        let mut row: Row = [
            ("name", "Mirror"),
            ("make", "Honda"),
            ("model", "Civic"),
            ("year", "soon"),
            ("price", "85"),
            ("imageurl", "https://img/civic.jpg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(row_to_input(&row).unwrap_err(), "Invalid year 'soon'");

        row.insert("year".to_string(), "2018".to_string());
        row.remove("imageurl");
        assert_eq!(row_to_input(&row).unwrap_err(), "Missing imageUrl");
    }

    #[test]
    fn format_detection() {
        assert_eq!(ImportFormat::from_filename(Some("stock.XLSX")), ImportFormat::Xlsx);
        assert_eq!(ImportFormat::from_filename(Some("stock.csv")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_filename(None), ImportFormat::Csv);
    }
}
