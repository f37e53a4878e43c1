use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::types::{Collection, CollectionsLoad};

/// Why the collection load could not produce any data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// The video API key is absent.
    Unconfigured(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready {
        collections: Arc<Vec<Collection>>,
        /// Non-fatal per-playlist failure recorded during the load.
        error: Option<String>,
    },
    Failed(LoadFailure),
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::Loading => "loading",
            LoadStatus::Ready { .. } => "ready",
            LoadStatus::Failed(_) => "failed",
        }
    }
}

/// Process-wide holder of the aggregated collections.
#[derive(Debug)]
pub struct CollectionCache {
    status: RwLock<LoadStatus>,
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionCache {
    pub fn new() -> Self {
        Self {
            status: RwLock::new(LoadStatus::Loading),
        }
    }

    /// Reset to `loading` ahead of a new aggregation pass.
    pub fn init(&self) {
        *self.status.write() = LoadStatus::Loading;
    }

    pub fn get(&self) -> LoadStatus {
        self.status.read().clone()
    }

    pub fn set(&self, load: CollectionsLoad) {
        let error = load.error.map(|err| err.to_string());
        info!(
            collections = load.collections.len(),
            with_errors = error.is_some(),
            "collection cache ready"
        );
        *self.status.write() = LoadStatus::Ready {
            collections: Arc::new(load.collections),
            error,
        };
    }

    pub fn fail(&self, failure: LoadFailure) {
        warn!(?failure, "collection load failed");
        *self.status.write() = LoadStatus::Failed(failure);
    }
}
