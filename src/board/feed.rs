use log::debug;
use tokio::sync::watch;

use super::errors::BoardResult;
use super::lifetime::Lifetime;
use crate::common::Comment;
use crate::storage::CommentStore;

/// What the board shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    /// Zero comments; rendered as a placeholder rather than an empty list.
    Empty,
    /// Every comment, newest first.
    Comments(Vec<Comment>),
}

impl FeedView {
    pub fn from_snapshot(comments: Vec<Comment>) -> Self {
        if comments.is_empty() {
            FeedView::Empty
        } else {
            FeedView::Comments(comments)
        }
    }
}

/// Live subscription to the comment list.
///
/// Every delivery replaces the whole list. The subscription is torn down
/// when the feed is dropped or its lifetime is cancelled.
pub struct Feed {
    receiver: watch::Receiver<Vec<Comment>>,
    lifetime: Lifetime,
    delivered_initial: bool,
}

impl Feed {
    pub fn open(store: &dyn CommentStore, lifetime: Lifetime) -> BoardResult<Self> {
        lifetime.ensure_alive()?;
        let receiver = store.subscribe()?;
        debug!("Opened comment feed");

        Ok(Self {
            receiver,
            lifetime,
            delivered_initial: false,
        })
    }

    /// Wait for the next snapshot.
    ///
    /// The first call returns the current list straight away. Returns `None`
    /// once the lifetime ends or the store stops publishing.
    pub async fn next(&mut self) -> Option<FeedView> {
        if !self.lifetime.is_alive() {
            return None;
        }

        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.take_current());
        }

        tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => None,
            changed = self.receiver.changed() => {
                if changed.is_err() || !self.lifetime.is_alive() {
                    return None;
                }
                Some(self.take_current())
            }
        }
    }

    fn take_current(&mut self) -> FeedView {
        FeedView::from_snapshot(self.receiver.borrow_and_update().clone())
    }
}
