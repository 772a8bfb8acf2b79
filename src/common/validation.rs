use thiserror::Error;

/// Client-side validation failures. These never reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in both name and message")]
    MissingCommentFields,

    #[error("Please wait for the photo upload to finish")]
    PhotoPending,

    #[error("Please fill in all fields")]
    MissingInquiryFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("File size exceeds 5MB limit")]
    PhotoTooLarge { size: u64 },

    #[error("Invalid file type. Please upload an image (JPEG, PNG, GIF, or WebP)")]
    UnsupportedPhotoType { mime_type: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
