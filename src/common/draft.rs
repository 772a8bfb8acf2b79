use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{NewComment, ValidationError, ValidationResult};

/// Status of a submission form.
///
/// `Idle -> Submitting -> Success | Error -> Idle`, with `Uploading` covering
/// the photo upload on comment forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Uploading,
    Submitting,
    Success,
    Error,
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormStatus::Idle => write!(f, "idle"),
            FormStatus::Uploading => write!(f, "uploading"),
            FormStatus::Submitting => write!(f, "submitting"),
            FormStatus::Success => write!(f, "success"),
            FormStatus::Error => write!(f, "error"),
        }
    }
}

/// Photo attached to a pending comment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhotoState {
    #[default]
    None,
    /// Upload in flight; only the local preview exists.
    Uploading { preview: String },
    /// Upload finished; `url` is the hosted secure URL.
    Ready { preview: String, url: String },
}

impl PhotoState {
    pub fn preview(&self) -> Option<&str> {
        match self {
            PhotoState::None => None,
            PhotoState::Uploading { preview } | PhotoState::Ready { preview, .. } => {
                Some(preview)
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            PhotoState::Ready { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Unsaved comment text plus any attached photo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentDraft {
    pub name: String,
    pub message: String,
    #[serde(skip)]
    pub photo: PhotoState,
}

impl CommentDraft {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            photo: PhotoState::None,
        }
    }

    /// Turn the draft into a store payload, trimming both text fields.
    pub fn validate(&self) -> ValidationResult<NewComment> {
        let name = self.name.trim();
        let message = self.message.trim();

        if name.is_empty() || message.is_empty() {
            return Err(ValidationError::MissingCommentFields);
        }

        if matches!(self.photo, PhotoState::Uploading { .. }) {
            return Err(ValidationError::PhotoPending);
        }
        let photo_url = self.photo.url().map(str::to_string);

        Ok(NewComment {
            name: name.to_string(),
            message: message.to_string(),
            photo_url,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.message.is_empty() && self.photo == PhotoState::None
    }
}
