use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload failed with status {status}")]
    Status { status: u16 },

    #[error("Upload failed: {message}")]
    MissingUrl { message: String },

    #[error("Upload failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UploadError {
    pub fn missing_url(message: impl AsRef<str>) -> Self {
        UploadError::MissingUrl {
            message: message.as_ref().to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Failed to send email: status {status}")]
    Status { status: u16 },

    #[error("Failed to send email: {0}")]
    Transport(#[from] reqwest::Error),
}
