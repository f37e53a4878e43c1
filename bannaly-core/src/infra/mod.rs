//! Adapters behind the [`crate::ports`] traits.

pub mod firestore;
pub mod http;
pub mod http_text;
pub mod imagekit;
pub mod memory;
pub mod youtube;

pub use firestore::{
    FirestoreClient, FirestoreCommentStore, FirestoreCounterStore,
    ServiceAccountKey,
};
pub use http_text::HttpTextFetcher;
pub use imagekit::{ImageKitClient, ImageKitCredentials};
pub use memory::{InMemoryCommentStore, InMemoryCounterStore};
pub use youtube::YouTubeClient;
