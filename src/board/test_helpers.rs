use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::watch;

use crate::common::{Comment, Inquiry, NewComment, PhotoFile, order_newest_first};
use crate::services::{ImageHost, MailError, Mailer, UploadError};
use crate::storage::errors::StoreResult;
use crate::storage::{CommentStore, StoreError};

/// In-memory store that counts writes and can be told to fail.
pub struct FakeStore {
    pub records: Mutex<Vec<Comment>>,
    pub create_calls: AtomicUsize,
    pub fail_writes: bool,
    pub slow_write: Option<Duration>,
    snapshots: watch::Sender<Vec<Comment>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            records: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            fail_writes: false,
            slow_write: None,
            snapshots,
        }
    }
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            slow_write: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Comment> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentStore for FakeStore {
    async fn create(&self, new_comment: NewComment) -> StoreResult<Comment> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.slow_write {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes {
            return Err(StoreError::rejected("backend unavailable"));
        }

        // Deterministic, strictly increasing server time
        let timestamp = Utc
            .timestamp_opt(1_700_000_000 + call as i64, 0)
            .unwrap();
        let comment = Comment::from_new(format!("fake-{}", call + 1), new_comment, timestamp);

        let snapshot = {
            let mut records = self.records.lock().unwrap();
            records.push(comment.clone());
            order_newest_first(records.clone())
        };
        self.snapshots.send_replace(snapshot);

        Ok(comment)
    }

    async fn snapshot(&self) -> StoreResult<Vec<Comment>> {
        Ok(order_newest_first(self.stored()))
    }

    fn subscribe(&self) -> StoreResult<watch::Receiver<Vec<Comment>>> {
        Ok(self.snapshots.subscribe())
    }
}

/// Image host returning a fixed URL, or failing when `url` is `None`.
pub struct FakeImageHost {
    pub url: Option<String>,
    pub upload_calls: AtomicUsize,
}

impl FakeImageHost {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            upload_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            upload_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, _photo: &PhotoFile) -> Result<String, UploadError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.url
            .clone()
            .ok_or_else(|| UploadError::missing_url("Unknown error"))
    }
}

/// Mailer that records what it was asked to send.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<Inquiry>>,
    pub reject_with: Option<u16>,
}

impl FakeMailer {
    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Inquiry> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, inquiry: &Inquiry) -> Result<(), MailError> {
        if let Some(status) = self.reject_with {
            return Err(MailError::Status { status });
        }
        self.sent.lock().unwrap().push(inquiry.clone());
        Ok(())
    }
}

pub fn png_photo(size: usize) -> PhotoFile {
    PhotoFile::new("photo.png", "image/png", vec![0; size])
}
