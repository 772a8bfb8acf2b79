use std::time::Instant;

use log::{debug, warn};

use super::errors::{BoardError, BoardResult};
use super::submission::CommentForm;
use crate::common::{FormStatus, PhotoFile, PhotoState, validate_photo};
use crate::services::ImageHost;

/// A photo that passed validation and whose preview is on the draft, waiting
/// for [`CommentForm::upload_photo`].
#[derive(Debug)]
pub struct PendingUpload {
    photo: PhotoFile,
    preview: String,
}

impl PendingUpload {
    pub fn file_name(&self) -> &str {
        &self.photo.file_name
    }
}

impl CommentForm {
    /// Validate a photo and put its local preview on the draft.
    ///
    /// A file that fails validation is rejected before any network call and
    /// leaves the current photo untouched. On success the draft holds
    /// `PhotoState::Uploading`, which it refuses to submit until
    /// [`CommentForm::upload_photo`] finishes.
    pub fn select_photo(&mut self, photo: PhotoFile) -> BoardResult<PendingUpload> {
        self.lifetime.ensure_alive()?;

        let now = Instant::now();
        self.state.refresh(now);
        if matches!(
            self.state.status(),
            FormStatus::Submitting | FormStatus::Uploading
        ) {
            return Err(BoardError::Busy);
        }

        if let Err(e) = validate_photo(&photo) {
            self.state.show_banner(e.to_string(), now);
            return Err(e.into());
        }

        let preview = photo.data_url();
        debug!(
            "Preview ready for {} ({} bytes)",
            photo.file_name,
            preview.len()
        );

        self.draft.photo = PhotoState::Uploading {
            preview: preview.clone(),
        };
        self.state.begin(FormStatus::Uploading);

        Ok(PendingUpload { photo, preview })
    }

    /// Upload a selected photo and attach the hosted URL to the draft.
    ///
    /// On failure the preview is cleared and the comment can still be posted
    /// without a photo. A photo replaced or removed since it was selected is
    /// not uploaded.
    pub async fn upload_photo(
        &mut self,
        host: &dyn ImageHost,
        pending: PendingUpload,
    ) -> BoardResult<String> {
        self.lifetime.ensure_alive()?;

        let still_selected = self.draft.photo.url().is_none()
            && self.draft.photo.preview() == Some(pending.preview.as_str());
        if !still_selected {
            return Err(BoardError::PhotoDiscarded);
        }

        let uploaded = self.lifetime.guard(host.upload(&pending.photo)).await?;

        self.state.settle();
        match uploaded {
            Ok(url) => {
                self.draft.photo = PhotoState::Ready {
                    preview: pending.preview,
                    url: url.clone(),
                };
                Ok(url)
            }
            Err(e) => {
                warn!("Error uploading photo: {}", e);
                self.draft.photo = PhotoState::None;
                let err = BoardError::from(e);
                self.state.show_banner(err.to_string(), Instant::now());
                Err(err)
            }
        }
    }

    /// Drop the selected photo. The image host is not contacted.
    #[cfg(test)]
    pub fn remove_photo(&mut self) {
        self.draft.photo = PhotoState::None;
        if self.state.status() == FormStatus::Uploading {
            self.state.settle();
        }
    }
}
