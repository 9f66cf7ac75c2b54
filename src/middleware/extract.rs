//! Extractors that report rejections through the `AppError` envelope.

use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;
use crate::services::media::{MediaFile, UploadForm};

/// `Path` whose rejection is a 400 `VALIDATION_ERROR` envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is a 400 `VALIDATION_ERROR` envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Like `axum::Json`, but malformed bodies and failed validation both
/// become `AppError::Validation` (400) instead of axum's 422.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(describe(&errors)))?;

        Ok(Self(value))
    }
}

/// Collect a multipart body: `file_field` becomes the file, everything
/// else is read as text.
pub async fn read_upload_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == file_field && field.file_name().is_some() {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?
                .to_vec();
            form.file = Some(MediaFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

/// Flatten field errors into one message, sorted by field name.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::flight_plan::CreateFlightPlan;
    use axum::{body::Body, http::header};

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let req = json_request(r#"{"name":"Morning Session","isActive":true}"#);
        let ValidatedJson(plan) = ValidatedJson::<CreateFlightPlan>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(plan.name, "Morning Session");
        assert_eq!(plan.is_active, Some(true));
    }

    #[tokio::test]
    async fn missing_field_is_validation_error() {
        let req = json_request(r#"{"isActive":true}"#);
        let err = ValidatedJson::<CreateFlightPlan>::from_request(req, &())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_rule_reports_its_message() {
        let req = json_request(r#"{"name":""}"#);
        let err = ValidatedJson::<CreateFlightPlan>::from_request(req, &())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "name is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
