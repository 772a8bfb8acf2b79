use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::ImageFormat;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::common::{ValidationError, ValidationResult};

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Error, Debug)]
pub enum PhotoReadError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An image selected for upload, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, sniffing its MIME type from the content.
    ///
    /// Files over [`MAX_PHOTO_BYTES`] are rejected from their metadata without
    /// reading any content.
    pub async fn read<P: AsRef<Path>>(path: P) -> Result<Self, PhotoReadError> {
        let path = path.as_ref();

        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_PHOTO_BYTES {
            return Err(ValidationError::PhotoTooLarge { size }.into());
        }

        // Capped in case the file grows after the size check
        let mut bytes = Vec::with_capacity(size as usize);
        tokio::fs::File::open(path)
            .await?
            .take(MAX_PHOTO_BYTES + 1)
            .read_to_end(&mut bytes)
            .await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let mime_type = sniff_mime_type(&bytes).to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Local preview as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Size is checked before type, so an oversized file of any type reports size.
pub fn validate_photo(photo: &PhotoFile) -> ValidationResult<()> {
    if photo.size() > MAX_PHOTO_BYTES {
        return Err(ValidationError::PhotoTooLarge { size: photo.size() });
    }

    if !ACCEPTED_MIME_TYPES.contains(&photo.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedPhotoType {
            mime_type: photo.mime_type.clone(),
        });
    }

    Ok(())
}

/// Ask the image host for a face-cropped thumbnail of the given size.
///
/// Only hosted URLs with a single `/upload/` segment are rewritten; anything
/// else comes back untouched.
pub fn optimized_image_url(url: &str, width: u32, height: u32) -> String {
    if !url.contains("cloudinary.com") {
        return url.to_string();
    }

    let parts: Vec<&str> = url.split("/upload/").collect();
    if parts.len() != 2 {
        return url.to_string();
    }

    format!(
        "{}/upload/w_{},h_{},c_fill,g_face,f_auto,q_auto/{}",
        parts[0], width, height, parts[1]
    )
}
