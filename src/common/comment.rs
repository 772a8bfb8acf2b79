use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type CommentId = String;

/// A comment as stored on the board. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The payload written to the comment store.
///
/// There is no timestamp here: the store stamps every record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub name: String,
    pub message: String,
    pub photo_url: Option<String>,
}

impl Comment {
    pub fn from_new(id: CommentId, new_comment: NewComment, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_comment.name,
            message: new_comment.message,
            photo_url: new_comment.photo_url,
            timestamp,
        }
    }

    /// Uppercased first letter of the author name, used when there is no photo.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Sort comments newest first. Equal timestamps keep their incoming order.
pub fn order_newest_first(mut comments: Vec<Comment>) -> Vec<Comment> {
    comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    comments
}
