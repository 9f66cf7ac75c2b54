//! Image hosting. Uploaded images go to Cloudinary and only the returned
//! `secure_url` is stored.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::{AppConfig, CloudinaryConfig};
use crate::errors::AppError;

/// An image received in a multipart request.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields plus the optional file of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<MediaFile>,
}

impl UploadForm {
    /// Trimmed value of a text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::Validation(format!("{name} is required")))
    }

    pub fn number<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::Validation(format!("Invalid {name} '{raw}'")))
            })
            .transpose()
    }
}

/// Destination for uploaded images.
#[async_trait]
pub trait MediaHost: Send + Sync + std::fmt::Debug {
    /// Store the file under `folder` and return its public URL.
    async fn upload(&self, file: MediaFile, folder: &str) -> Result<String, AppError>;
}

/// Pick the media host for this configuration.
pub fn from_config(config: &AppConfig) -> Arc<dyn MediaHost> {
    match &config.cloudinary {
        Some(cloudinary) => Arc::new(CloudinaryHost::new(cloudinary.clone())),
        None => {
            tracing::warn!("Cloudinary credentials not set; image uploads will fail");
            Arc::new(UnconfiguredHost)
        }
    }
}

/// Signed uploads to the Cloudinary image API.
#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// SHA-256 request signature: the sorted `key=value` pairs joined with `&`,
/// followed by the API secret.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: MediaFile, folder: &str) -> Result<String, AppError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder.to_string()), ("timestamp", timestamp.clone())],
            &self.config.api_secret,
        );

        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| AppError::Validation(format!("Invalid image content type: {e}")))?;
        }

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Image upload failed: {e}")))?;

        let status = response.status();
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Unreadable media host response: {e}")))?;

        match (body.secure_url, body.error) {
            (Some(url), _) if status.is_success() => {
                tracing::info!(folder, url = %url, "Image uploaded");
                Ok(url)
            }
            (_, Some(err)) => Err(AppError::Upstream(format!("Image upload failed: {}", err.message))),
            _ => Err(AppError::Upstream(format!("Image upload failed with status {status}"))),
        }
    }
}

/// Stand-in used when no credentials are configured.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredHost;

#[async_trait]
impl MediaHost for UnconfiguredHost {
    async fn upload(&self, _file: MediaFile, _folder: &str) -> Result<String, AppError> {
        Err(AppError::Upstream("Media host is not configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_order_independent() {
        let a = sign(
            &[("timestamp", "1700000000".into()), ("folder", "products".into())],
            "secret",
        );
        let b = sign(
            &[("folder", "products".into()), ("timestamp", "1700000000".into())],
            "secret",
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn signature_matches_manual_digest() {
        let expected = hex::encode(Sha256::digest(b"folder=products&timestamp=1700000000secret"));
        let actual = sign(
            &[("folder", "products".into()), ("timestamp", "1700000000".into())],
            "secret",
        );
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn unconfigured_host_reports_upstream_error() {
        let file = MediaFile {
            file_name: "demio.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![0xFF, 0xD8],
        };
        let err = UnconfiguredHost.upload(file, "products").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
