//! Async traits at each I/O seam. Services hold these as `Arc<dyn _>` so the
//! server can swap Firestore for memory and tests can swap in mocks.

pub mod comments;
pub mod counters;
pub mod files;
pub mod playlists;
pub mod text;

pub use comments::CommentStore;
pub use counters::CounterStore;
pub use files::{FileStore, ListFilesQuery};
pub use playlists::PlaylistSource;
pub use text::TextFetcher;
