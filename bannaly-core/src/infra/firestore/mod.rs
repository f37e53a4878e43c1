//! Firestore REST v1 adapter: service-account auth, document reads,
//! transactional commits and queries.

pub mod auth;
pub mod client;
pub mod comments;
pub mod counters;
pub mod values;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::{CommitOutcome, FirestoreClient};
pub use comments::FirestoreCommentStore;
pub use counters::FirestoreCounterStore;
pub use values::Document;

/// Collection holding comment documents.
pub const COMMENTS_COLLECTION: &str = "videoComments";
pub const BOOK_VIEWS_COLLECTION: &str = "bookViews";
pub const BOOK_VIEWS_FIELD: &str = "views";
pub const AUDIO_LIKES_COLLECTION: &str = "audioLikes";
pub const AUDIO_LIKES_FIELD: &str = "likes";
