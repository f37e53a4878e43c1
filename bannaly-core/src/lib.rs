//! # Bannaly Core
//!
//! Core library for the Bannaly digital library backend. It aggregates three
//! external services into the data the web frontend renders:
//!
//! - **Catalog**: books (PDF + cover) and audio (track + text description)
//!   listed from two ImageKit accounts and paired by base filename
//! - **Collections**: curated YouTube playlists fetched page by page and
//!   flattened into video records
//! - **Counters**: book views and audio likes, kept in memory or in Firestore
//! - **Comments**: flat comment documents rebuilt into a reply tree
//!
//! ## Architecture
//!
//! - [`domain`]: pure types and algorithms (matching, aggregation, tree building)
//! - [`ports`]: async traits at every I/O seam
//! - [`infra`]: REST clients for ImageKit, Firestore and YouTube plus the
//!   in-memory stores
//! - [`application`]: services the HTTP layer calls

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Route paths shared by the server and its tests
pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ports;

pub use error::{LibraryError, Result};

pub use domain::catalog::{
    AudioTrack, Book, CatalogPage, CategoryRule, FileDescriptor, FileKind,
    MatchedEntry, PageRequest,
};
pub use domain::collections::{
    Collection, CollectionCache, CollectionConfig, CollectionsLoad,
    LoadStatus, VideoRecord,
};
pub use domain::comments::{Comment, CommentNode, NewComment};
