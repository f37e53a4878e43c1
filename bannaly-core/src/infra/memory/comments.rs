use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::comments::Comment;
use crate::domain::counters::incremented;
use crate::error::{LibraryError, Result};
use crate::ports::CommentStore;

#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments: RwLock::new(comments),
        }
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn list_for_subject(&self, subject_id: &str) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .read()
            .iter()
            .filter(|comment| comment.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment> {
        self.comments.write().push(comment.clone());
        Ok(comment)
    }

    async fn increment_likes(&self, comment_id: &str) -> Result<u64> {
        let mut comments = self.comments.write();
        let comment = comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| {
                LibraryError::NotFound(format!("comment {comment_id}"))
            })?;
        comment.like_count = incremented(comment.like_count);
        Ok(comment.like_count)
    }
}
