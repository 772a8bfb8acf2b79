use std::time::{Duration, Instant};

use crate::common::FormStatus;

/// How long the success indicator stays up before the form returns to idle.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// How long an error banner stays visible.
pub const BANNER_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Banner {
    message: String,
    until: Instant,
}

/// Status and banner bookkeeping shared by every form.
///
/// Timed transitions (`Success -> Idle`, `Error -> Idle`, banner expiry) are
/// applied lazily against the instant passed to [`SubmitState::refresh`].
#[derive(Debug, Clone, Default)]
pub struct SubmitState {
    status: FormStatus,
    status_until: Option<Instant>,
    banner: Option<Banner>,
}

impl SubmitState {
    pub fn refresh(&mut self, now: Instant) {
        if let Some(until) = self.status_until {
            if now >= until {
                self.status = FormStatus::Idle;
                self.status_until = None;
            }
        }

        if self.banner.as_ref().is_some_and(|b| now >= b.until) {
            self.banner = None;
        }
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.message.as_str())
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !matches!(
            self.status,
            FormStatus::Submitting | FormStatus::Uploading | FormStatus::Success
        )
    }

    pub fn begin(&mut self, status: FormStatus) {
        self.status = status;
        self.status_until = None;
        self.banner = None;
    }

    pub fn succeed(&mut self, now: Instant) {
        self.status = FormStatus::Success;
        self.status_until = Some(now + SUCCESS_DISPLAY);
    }

    pub fn fail(&mut self, message: impl Into<String>, now: Instant) {
        self.status = FormStatus::Error;
        self.status_until = Some(now + BANNER_DISPLAY);
        self.show_banner(message, now);
    }

    /// Return to idle without a timed state, e.g. after a photo upload.
    pub fn settle(&mut self) {
        self.status = FormStatus::Idle;
        self.status_until = None;
    }

    pub fn show_banner(&mut self, message: impl Into<String>, now: Instant) {
        self.banner = Some(Banner {
            message: message.into(),
            until: now + BANNER_DISPLAY,
        });
    }
}
