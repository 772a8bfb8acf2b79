//! The comment board: form controllers, photo uploads and the live feed.

pub mod errors;
pub mod feed;
pub mod inquiry;
pub mod lifetime;
pub mod state;
pub mod submission;
pub mod uploader;

#[cfg(test)]
pub mod test_helpers;

pub use errors::BoardError;
pub use feed::{Feed, FeedView};
pub use inquiry::InquiryForm;
pub use lifetime::Lifetime;
pub use submission::CommentForm;
