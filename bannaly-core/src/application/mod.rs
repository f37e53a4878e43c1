//! Services the HTTP layer calls. Each one owns its ports as `Arc<dyn _>`.

pub mod catalog;
pub mod collections;
pub mod comments;

pub use catalog::{CatalogKind, CatalogService, CatalogSettings};
pub use collections::{CollectionLoader, DEFAULT_MAX_PAGES, fetch_playlist_items};
pub use comments::{CommentService, LIKE_REACTION};
