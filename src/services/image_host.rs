use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::errors::UploadError;
use crate::common::PhotoFile;

/// A hosted image service that turns an uploaded file into a stable URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload the photo and return its secure (HTTPS) URL.
    async fn upload(&self, photo: &PhotoFile) -> Result<String, UploadError>;
}

/// Unsigned uploads to a Cloudinary cloud.
pub struct CloudinaryHost {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadResponseError>,
}

#[derive(Debug, Deserialize)]
struct UploadResponseError {
    message: String,
}

impl CloudinaryHost {
    pub fn new(cloud_name: &str, upload_preset: impl Into<String>) -> Self {
        Self::with_endpoint(
            format!("https://api.cloudinary.com/v1_1/{}/image/upload", cloud_name),
            upload_preset,
        )
    }

    pub fn with_endpoint(endpoint: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            upload_preset: upload_preset.into(),
        }
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, photo: &PhotoFile) -> Result<String, UploadError> {
        let file_part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.mime_type)?;

        let form = Form::new()
            .part("file", file_part)
            .text("upload_preset", self.upload_preset.clone());

        debug!(
            "Uploading {} ({} bytes) to {}",
            photo.file_name,
            photo.size(),
            self.endpoint
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Image upload rejected with status {}", status);
            return Err(UploadError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let body: UploadResponse = serde_json::from_str(&text)
            .map_err(|e| UploadError::missing_url(format!("unreadable response: {}", e)))?;
        secure_url_from(body)
    }
}

fn secure_url_from(body: UploadResponse) -> Result<String, UploadError> {
    match body.secure_url {
        Some(url) if url.starts_with("https://") => Ok(url),
        Some(url) => Err(UploadError::missing_url(format!("insecure URL {}", url))),
        None => Err(UploadError::missing_url(
            body.error
                .map(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string()),
        )),
    }
}
