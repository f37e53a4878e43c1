//! Book and audio catalog: file descriptors from the file store, filename
//! matching, and the listing payloads served to the frontend.

pub mod matcher;
pub mod paging;
pub mod types;

pub use matcher::{
    CategoryRule, CategoryRules, MatchedEntry, base_name, lookup_key,
    match_files,
};
pub use paging::{CatalogListing, CatalogPage, PageRequest};
pub use types::{
    AudioTrack, Book, DEFAULT_AUTHOR, DESCRIPTION_FALLBACK, FileDescriptor,
    FileKind,
};
