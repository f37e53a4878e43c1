use std::{fmt, sync::Arc};

use bannaly_config::{Config, StorageBackend};
use bannaly_core::CollectionCache;
use bannaly_core::application::{CatalogService, CollectionLoader, CommentService};

/// Services built from configuration, before they are shared with handlers.
#[derive(Debug)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub comments: CommentService,
    pub loader: CollectionLoader,
    /// Backend actually in use after fallbacks.
    pub storage: StorageBackend,
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    catalog: Arc<CatalogService>,
    comments: Arc<CommentService>,
    loader: Arc<CollectionLoader>,
    collections: Arc<CollectionCache>,
    storage: StorageBackend,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.storage)
            .field("dev_mode", &self.config.dev_mode)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Arc<Config>, services: AppServices) -> Self {
        let AppServices {
            catalog,
            comments,
            loader,
            storage,
        } = services;

        Self {
            config,
            catalog: Arc::new(catalog),
            comments: Arc::new(comments),
            loader: Arc::new(loader),
            collections: Arc::new(CollectionCache::new()),
            storage,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn comments(&self) -> &CommentService {
        &self.comments
    }

    pub fn loader(&self) -> Arc<CollectionLoader> {
        Arc::clone(&self.loader)
    }

    pub fn collections(&self) -> Arc<CollectionCache> {
        Arc::clone(&self.collections)
    }

    pub fn storage(&self) -> StorageBackend {
        self.storage
    }
}
