use std::time::Instant;

use log::{info, warn};

use super::errors::{BoardError, BoardResult};
use super::lifetime::Lifetime;
use super::state::SubmitState;
use crate::common::{Comment, CommentDraft, FormStatus};
use crate::storage::CommentStore;

/// Controller for the comment form.
///
/// Owns the draft and its submission status exclusively; nothing else
/// mutates them. Photo handling lives in `board::uploader`.
#[derive(Debug)]
pub struct CommentForm {
    pub(super) draft: CommentDraft,
    pub(super) state: SubmitState,
    pub(super) lifetime: Lifetime,
}

impl CommentForm {
    pub fn new(lifetime: Lifetime) -> Self {
        Self {
            draft: CommentDraft::default(),
            state: SubmitState::default(),
            lifetime,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.draft.message = message.into();
    }

    #[cfg(test)]
    pub fn draft(&self) -> &CommentDraft {
        &self.draft
    }

    #[cfg(test)]
    pub fn status_at(&mut self, now: Instant) -> FormStatus {
        self.state.refresh(now);
        self.state.status()
    }

    /// The error banner still visible at `now`, if any.
    pub fn banner_at(&mut self, now: Instant) -> Option<&str> {
        self.state.refresh(now);
        self.state.banner()
    }

    #[cfg(test)]
    pub fn can_submit_at(&mut self, now: Instant) -> bool {
        self.state.refresh(now);
        self.state.can_submit()
    }

    /// Validate the draft and write it to the store.
    ///
    /// Nothing is written when validation fails. On success the draft is
    /// cleared and the form shows success for
    /// [`super::state::SUCCESS_DISPLAY`]. On failure the draft is kept for a
    /// manual retry.
    pub async fn submit(&mut self, store: &dyn CommentStore) -> BoardResult<Comment> {
        self.lifetime.ensure_alive()?;

        let now = Instant::now();
        self.state.refresh(now);
        if !self.state.can_submit() {
            return Err(BoardError::Busy);
        }

        let new_comment = match self.draft.validate() {
            Ok(new_comment) => new_comment,
            Err(e) => {
                self.state.show_banner(e.to_string(), now);
                return Err(e.into());
            }
        };

        self.state.begin(FormStatus::Submitting);
        let result = self.lifetime.guard(store.create(new_comment)).await?;

        match result {
            Ok(comment) => {
                info!("Posted comment {}", comment.id);
                self.draft.reset();
                self.state.succeed(Instant::now());
                Ok(comment)
            }
            Err(e) => {
                warn!("Error adding comment: {}", e);
                let err = BoardError::from(e);
                self.state.fail(err.to_string(), Instant::now());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::state::SUCCESS_DISPLAY;
    use crate::board::test_helpers::*;
    use crate::common::{PhotoState, ValidationError};

    fn form_with(name: &str, message: &str) -> CommentForm {
        let mut form = CommentForm::new(Lifetime::new());
        form.set_name(name);
        form.set_message(message);
        form
    }

    #[tokio::test]
    async fn test_blank_fields_never_reach_store() {
        let store = FakeStore::default();

        for (name, message) in [("", "msg"), ("Ana", "   "), (" \t", "\n")] {
            let mut form = form_with(name, message);
            let result = form.submit(&store).await;

            assert!(matches!(
                result,
                Err(BoardError::Validation(ValidationError::MissingCommentFields))
            ));
            assert_eq!(
                form.banner_at(Instant::now()),
                Some("Please fill in both name and message")
            );
            assert_eq!(form.status_at(Instant::now()), FormStatus::Idle);
            assert_eq!(form.draft().name, name, "draft must be left as typed");
        }

        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_text_only_comment() {
        let store = FakeStore::default();
        let mut form = form_with("Ana", "Great site!");

        let comment = form.submit(&store).await.unwrap();

        let stored = store.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Ana");
        assert_eq!(stored[0].message, "Great site!");
        assert_eq!(stored[0].photo_url, None);
        assert_eq!(stored[0], comment);

        assert!(form.draft().is_empty());
        let now = Instant::now();
        assert_eq!(form.status_at(now), FormStatus::Success);
        assert!(!form.can_submit_at(now));
        assert_eq!(form.status_at(now + SUCCESS_DISPLAY), FormStatus::Idle);
        assert!(form.can_submit_at(now + SUCCESS_DISPLAY));
    }

    #[tokio::test]
    async fn test_fields_are_trimmed() {
        let store = FakeStore::default();
        let mut form = form_with("  Ana  ", "\n Great site! \n");

        form.submit(&store).await.unwrap();

        assert_eq!(store.stored()[0].name, "Ana");
        assert_eq!(store.stored()[0].message, "Great site!");
    }

    #[tokio::test]
    async fn test_uploaded_photo_is_attached() {
        let store = FakeStore::default();
        let mut form = form_with("Ana", "With photo");
        form.draft.photo = PhotoState::Ready {
            preview: "data:image/png;base64,AA==".to_string(),
            url: "https://res.cloudinary.com/demo/a.png".to_string(),
        };

        form.submit(&store).await.unwrap();

        assert_eq!(
            store.stored()[0].photo_url.as_deref(),
            Some("https://res.cloudinary.com/demo/a.png")
        );
        assert_eq!(form.draft().photo, PhotoState::None);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_draft() {
        let store = FakeStore::failing();
        let mut form = form_with("Ana", "Great site!");

        let err = form.submit(&store).await.unwrap_err();

        assert!(matches!(err, BoardError::Store(_)));
        assert_eq!(err.to_string(), "Failed to post comment. Please try again.");
        assert_eq!(store.calls(), 1, "no automatic retry");
        assert_eq!(form.draft().name, "Ana");
        assert_eq!(form.draft().message, "Great site!");

        let now = Instant::now();
        assert_eq!(form.status_at(now), FormStatus::Error);
        assert!(form.can_submit_at(now));
        assert_eq!(form.status_at(now + Duration::from_secs(3)), FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_double_submit_creates_two_records() {
        let store = FakeStore::default();
        let mut form = form_with("Ana", "Hi");
        form.submit(&store).await.unwrap();

        // Wait out the success window, then send the same text again
        form.state.refresh(Instant::now() + SUCCESS_DISPLAY);
        form.set_name("Ana");
        form.set_message("Hi");
        form.submit(&store).await.unwrap();

        let stored = store.stored();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].id, stored[1].id);
    }

    #[tokio::test]
    async fn test_submit_blocked_during_success_window() {
        let store = FakeStore::default();
        let mut form = form_with("Ana", "Hi");
        form.submit(&store).await.unwrap();

        form.set_name("Ana");
        form.set_message("Again");
        let result = form.submit(&store).await;

        assert!(matches!(result, Err(BoardError::Busy)));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_board_discards_result() {
        let store = FakeStore::slow(Duration::from_millis(200));
        let lifetime = Lifetime::new();
        let mut form = CommentForm::new(lifetime.clone());
        form.set_name("Ana");
        form.set_message("Late");

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            lifetime.cancel();
        });

        let result = form.submit(&store).await;

        assert!(matches!(result, Err(BoardError::Cancelled)));
        assert_eq!(form.draft().message, "Late");
    }
}
