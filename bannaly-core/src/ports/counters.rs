use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// One family of non-negative counters keyed by item id (book views, audio
/// likes). Absent keys read as zero.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<u64>;

    /// All stored values, for one-read enrichment of a listing.
    async fn snapshot(&self) -> Result<HashMap<String, u64>>;

    /// Atomically add one and return the new value.
    async fn increment(&self, key: &str) -> Result<u64>;

    /// Atomically undo a like when `was_liked`, otherwise add one.
    async fn toggle(&self, key: &str, was_liked: bool) -> Result<u64>;
}
