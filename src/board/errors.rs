use thiserror::Error;

use crate::common::ValidationError;
use crate::services::{MailError, UploadError};
use crate::storage::StoreError;

/// Failures surfaced by the board forms.
///
/// The display text of each variant is the message shown to the user; the
/// underlying cause stays reachable through `source()`.
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("Failed to post comment. Please try again.")]
    Store(#[from] StoreError),

    #[error("Failed to send message. Please try again.")]
    Mail(#[from] MailError),

    #[error("A submission is already in progress")]
    Busy,

    #[error("The photo was replaced or removed before it was uploaded")]
    PhotoDiscarded,

    #[error("The board was closed before the operation finished")]
    Cancelled,
}

pub type BoardResult<T> = Result<T, BoardError>;
