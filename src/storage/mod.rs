pub mod comment_store;
pub mod errors;

pub use comment_store::{CommentStore, LocalCommentStore};
pub use errors::StoreError;
