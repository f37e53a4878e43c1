//! Process-local stores used when no document store is configured, and by
//! tests.

pub mod comments;
pub mod counters;

pub use comments::InMemoryCommentStore;
pub use counters::InMemoryCounterStore;
