use async_trait::async_trait;

use crate::domain::comments::Comment;
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Flat list of every comment on the subject, in no particular order.
    async fn list_for_subject(&self, subject_id: &str) -> Result<Vec<Comment>>;

    async fn insert(&self, comment: Comment) -> Result<Comment>;

    /// Atomically bump the like count of a comment. `NotFound` when no
    /// comment has this id.
    async fn increment_likes(&self, comment_id: &str) -> Result<u64>;
}
