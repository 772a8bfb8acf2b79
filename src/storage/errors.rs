use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Comment store at {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Comment store initialization error: {message}")]
    Init { message: String },

    #[error("Comment store rejected the write: {message}")]
    Rejected { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn corrupt(path: impl Into<PathBuf>, message: impl AsRef<str>) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            message: message.as_ref().to_string(),
        }
    }

    pub fn init(message: impl AsRef<str>) -> Self {
        StoreError::Init {
            message: message.as_ref().to_string(),
        }
    }

    pub fn rejected(message: impl AsRef<str>) -> Self {
        StoreError::Rejected {
            message: message.as_ref().to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
