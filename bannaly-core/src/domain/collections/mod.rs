//! Curated video collections sourced from external playlists.

pub mod aggregator;
pub mod cache;
pub mod types;

pub use aggregator::{
    EMBED_URL_PREFIX, assemble_collection, embed_url, to_video_record,
    untitled_video,
};
pub use cache::{CollectionCache, LoadFailure, LoadStatus};
pub use types::{
    Collection, CollectionConfig, CollectionsLoad, PlaylistItem, PlaylistPage,
    PlaylistSnippet, ResourceId, Thumbnail, Thumbnails, VideoRecord,
};
