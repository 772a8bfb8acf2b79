use std::time::Instant;

use log::{info, warn};

use super::errors::{BoardError, BoardResult};
use super::lifetime::Lifetime;
use super::state::SubmitState;
use crate::common::{FormStatus, InquiryDraft};
use crate::services::Mailer;

/// Controller for the contact form. Same state machine as the comment form.
#[derive(Debug)]
pub struct InquiryForm {
    draft: InquiryDraft,
    state: SubmitState,
    lifetime: Lifetime,
}

impl InquiryForm {
    pub fn new(lifetime: Lifetime) -> Self {
        Self {
            draft: InquiryDraft::default(),
            state: SubmitState::default(),
            lifetime,
        }
    }

    pub fn with_draft(lifetime: Lifetime, draft: InquiryDraft) -> Self {
        Self {
            draft,
            ..Self::new(lifetime)
        }
    }

    #[cfg(test)]
    pub fn draft(&self) -> &InquiryDraft {
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

    pub async fn send(&mut self, mailer: &dyn Mailer) -> BoardResult<()> {
        self.lifetime.ensure_alive()?;

        let now = Instant::now();
        self.state.refresh(now);
        if !self.state.can_submit() {
            return Err(BoardError::Busy);
        }

        let inquiry = match self.draft.validate() {
            Ok(inquiry) => inquiry,
            Err(e) => {
                self.state.show_banner(e.to_string(), now);
                return Err(e.into());
            }
        };

        self.state.begin(FormStatus::Submitting);
        let result = self.lifetime.guard(mailer.send(&inquiry)).await?;

        match result {
            Ok(()) => {
                info!("Sent inquiry from {}", inquiry.email);
                self.draft.reset();
                self.state.succeed(Instant::now());
                Ok(())
            }
            Err(e) => {
                warn!("Error sending email: {}", e);
                let err = BoardError::from(e);
                self.state.fail(err.to_string(), Instant::now());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::state::SUCCESS_DISPLAY;
    use crate::board::test_helpers::*;
    use crate::common::ValidationError;

    fn form(name: &str, email: &str, message: &str) -> InquiryForm {
        InquiryForm::with_draft(Lifetime::new(), InquiryDraft::new(name, email, message))
    }

    #[tokio::test]
    async fn test_send_inquiry() {
        let mailer = FakeMailer::default();
        let mut form = form("Ana", "ana@example.com", "Let's work together");

        form.send(&mailer).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].email, "ana@example.com");
        assert_eq!(form.draft(), &InquiryDraft::default());

        let now = Instant::now();
        assert_eq!(form.status_at(now), FormStatus::Success);
        assert_eq!(form.status_at(now + SUCCESS_DISPLAY), FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_malformed_email_not_sent() {
        let mailer = FakeMailer::default();
        let mut form = form("Ana", "ana.example.com", "Hi");

        let err = form.send(&mailer).await.unwrap_err();

        assert!(matches!(
            err,
            BoardError::Validation(ValidationError::InvalidEmail)
        ));
        assert_eq!(
            form.banner_at(Instant::now()),
            Some("Please enter a valid email address")
        );
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_send_keeps_draft() {
        let mailer = FakeMailer::rejecting(400);
        let mut form = form("Ana", "ana@example.com", "Hi");

        let err = form.send(&mailer).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to send message. Please try again.");
        assert_eq!(form.draft().name, "Ana");
        assert_eq!(form.status_at(Instant::now()), FormStatus::Error);
    }
}
