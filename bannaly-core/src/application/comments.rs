use std::sync::Arc;

use tracing::info;

use crate::domain::comments::{CommentNode, NewComment, build_tree};
use crate::error::{LibraryError, Result};
use crate::ports::CommentStore;

/// The only reaction type accepted on comments.
pub const LIKE_REACTION: &str = "like";

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService")
            .field("store", &std::any::type_name_of_val(self.store.as_ref()))
            .finish()
    }
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    pub async fn list_tree(&self, subject_id: &str) -> Result<Vec<CommentNode>> {
        let subject_id = subject_id.trim();
        if subject_id.is_empty() {
            return Err(LibraryError::Validation("Video ID is required".into()));
        }
        let flat = self.store.list_for_subject(subject_id).await?;
        Ok(build_tree(flat))
    }

    pub async fn add(
        &self,
        subject_id: &str,
        submission: NewComment,
    ) -> Result<CommentNode> {
        let comment = submission.into_comment(subject_id)?;
        let stored = self.store.insert(comment).await?;
        info!(
            comment_id = %stored.id,
            subject_id = %stored.subject_id,
            reply = stored.parent_id.is_some(),
            "comment added"
        );
        Ok(CommentNode::from(stored))
    }

    /// Record a reaction and return the comment's new like count.
    pub async fn react(
        &self,
        comment_id: &str,
        reaction: Option<&str>,
    ) -> Result<u64> {
        if reaction != Some(LIKE_REACTION) {
            return Err(LibraryError::Validation("Invalid reaction type".into()));
        }
        let comment_id = comment_id.trim();
        if comment_id.is_empty() {
            return Err(LibraryError::Validation("Comment ID is required".into()));
        }

        let likes = self.store.increment_likes(comment_id).await?;
        info!(comment_id, likes, "comment liked");
        Ok(likes)
    }
}
