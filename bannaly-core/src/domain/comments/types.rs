use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LibraryError, Result};

/// Author recorded when the submitter leaves the name blank.
pub const ANONYMOUS_AUTHOR: &str = "អ្នកប្រើប្រាស់អនាមិក";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub subject_id: String,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub parent_id: Option<String>,
    pub like_count: u64,
}

/// A comment with its replies attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl From<Comment> for CommentNode {
    fn from(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }
}

/// A comment as submitted, before the server assigns identity and time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl NewComment {
    /// Validate the submission and stamp it with a fresh id and the current
    /// time. Text is trimmed and must not be empty.
    pub fn into_comment(self, subject_id: &str) -> Result<Comment> {
        self.into_comment_at(subject_id, Utc::now())
    }

    pub fn into_comment_at(
        self,
        subject_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Comment> {
        let subject_id = subject_id.trim();
        let text = self.text.as_deref().map(str::trim).unwrap_or_default();
        if subject_id.is_empty() || text.is_empty() {
            return Err(LibraryError::Validation(
                "Video ID and non-empty comment text are required".into(),
            ));
        }

        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string();

        let parent_id = self
            .parent_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(Comment {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            text: text.to_string(),
            author,
            timestamp,
            parent_id,
            like_count: 0,
        })
    }
}
