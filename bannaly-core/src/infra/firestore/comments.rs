use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use super::client::{FirestoreClient, update_existing_write};
use super::values::{Document, integer_value, optional_string_value, string_value};
use crate::domain::comments::{ANONYMOUS_AUTHOR, Comment};
use crate::domain::counters::incremented;
use crate::error::{LibraryError, Result};
use crate::ports::CommentStore;

const SUBJECT_FIELD: &str = "videoId";
const TEXT_FIELD: &str = "text";
const AUTHOR_FIELD: &str = "author";
const TIMESTAMP_FIELD: &str = "timestamp";
const PARENT_FIELD: &str = "parentId";
const LIKES_FIELD: &str = "likes";

/// Comments stored one document per comment, keyed by comment id.
#[derive(Debug, Clone)]
pub struct FirestoreCommentStore {
    client: Arc<FirestoreClient>,
    collection: String,
}

impl FirestoreCommentStore {
    pub fn new(client: Arc<FirestoreClient>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

pub(crate) fn comment_fields(comment: &Comment) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(SUBJECT_FIELD.into(), string_value(&comment.subject_id));
    fields.insert(TEXT_FIELD.into(), string_value(&comment.text));
    fields.insert(AUTHOR_FIELD.into(), string_value(&comment.author));
    fields.insert(
        TIMESTAMP_FIELD.into(),
        string_value(&comment.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    fields.insert(
        PARENT_FIELD.into(),
        optional_string_value(comment.parent_id.as_deref()),
    );
    fields.insert(LIKES_FIELD.into(), integer_value(comment.like_count));
    fields
}

pub(crate) fn comment_from_document(doc: &Document) -> Comment {
    let id = doc.id().to_string();
    let timestamp = doc.timestamp(TIMESTAMP_FIELD).unwrap_or_else(|| {
        warn!(comment_id = %id, "comment has no readable timestamp");
        DateTime::<Utc>::UNIX_EPOCH
    });

    Comment {
        subject_id: doc.string(SUBJECT_FIELD).unwrap_or_default().to_string(),
        text: doc.string(TEXT_FIELD).unwrap_or_default().to_string(),
        author: doc
            .string(AUTHOR_FIELD)
            .filter(|author| !author.trim().is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string(),
        timestamp,
        parent_id: doc
            .string(PARENT_FIELD)
            .filter(|parent| !parent.is_empty())
            .map(str::to_string),
        like_count: doc.integer(LIKES_FIELD),
        id,
    }
}

#[async_trait]
impl CommentStore for FirestoreCommentStore {
    async fn list_for_subject(&self, subject_id: &str) -> Result<Vec<Comment>> {
        let documents = self
            .client
            .query_equal(&self.collection, SUBJECT_FIELD, subject_id)
            .await?;
        Ok(documents.iter().map(comment_from_document).collect())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment> {
        self.client
            .create_document(&self.collection, &comment.id, comment_fields(&comment))
            .await?;
        Ok(comment)
    }

    async fn increment_likes(&self, comment_id: &str) -> Result<u64> {
        let client = self.client.as_ref();
        let collection = self.collection.as_str();
        let name = client.document_name(collection, comment_id)?;
        let name = &name;

        client
            .transact(move |transaction| async move {
                let current = client
                    .get_document(collection, comment_id, Some(&transaction))
                    .await?
                    .ok_or_else(|| {
                        LibraryError::NotFound(format!("comment {comment_id}"))
                    })?
                    .integer(LIKES_FIELD);
                let next = incremented(current);

                let mut fields = Map::new();
                fields.insert(LIKES_FIELD.to_string(), integer_value(next));
                Ok((vec![update_existing_write(name, fields)], next))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fields_round_trip_through_document() {
        let comment = Comment {
            id: "c1".into(),
            subject_id: "vid".into(),
            text: "សួស្តី".into(),
            author: "Dara".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            parent_id: Some("c0".into()),
            like_count: 4,
        };
        let doc = Document {
            name: "projects/p/databases/(default)/documents/videoComments/c1".into(),
            fields: comment_fields(&comment),
        };
        assert_eq!(comment_from_document(&doc), comment);
    }

    #[test]
    fn legacy_document_fills_defaults() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/videoComments/old",
            "fields": {
                "videoId": {"stringValue": "vid"},
                "text": {"stringValue": "hi"},
                "timestamp": {"stringValue": "2023-01-01T00:00:00.000Z"},
                "parentId": {"nullValue": null}
            }
        }))
        .unwrap();
        let comment = comment_from_document(&doc);
        assert_eq!(comment.id, "old");
        assert_eq!(comment.author, ANONYMOUS_AUTHOR);
        assert_eq!(comment.parent_id, None);
        assert_eq!(comment.like_count, 0);
    }
}
