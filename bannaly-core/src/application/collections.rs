use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::collections::{
    CollectionCache, CollectionConfig, CollectionsLoad, LoadFailure,
    PlaylistItem, assemble_collection,
};
use crate::error::{LibraryError, Result};
use crate::ports::PlaylistSource;

pub const DEFAULT_MAX_PAGES: usize = 200;

/// Follow a playlist's page cursor until it runs out, an empty page comes
/// back, or `max_pages` pages were read. A failing page stops the walk and is
/// returned next to the items collected before it.
pub async fn fetch_playlist_items(
    source: &dyn PlaylistSource,
    playlist_id: &str,
    max_pages: usize,
) -> (Vec<PlaylistItem>, Option<LibraryError>) {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    for page_number in 1..=max_pages {
        let page = match source.fetch_page(playlist_id, page_token.take()).await {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    playlist_id,
                    page_number,
                    error = %err,
                    "playlist page fetch failed"
                );
                return (items, Some(err));
            }
        };

        if page.items.is_empty() {
            return (items, None);
        }
        items.extend(page.items);

        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => page_token = Some(token),
            None => return (items, None),
        }
    }

    warn!(
        playlist_id,
        max_pages,
        items = items.len(),
        "playlist page limit reached"
    );
    (items, None)
}

/// Builds every configured collection from its playlist.
pub struct CollectionLoader {
    source: Option<Arc<dyn PlaylistSource>>,
    configs: Vec<CollectionConfig>,
    max_pages: usize,
}

impl std::fmt::Debug for CollectionLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionLoader")
            .field("configured", &self.source.is_some())
            .field("collections", &self.configs.len())
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl CollectionLoader {
    /// `source` is `None` when no video API key is configured.
    pub fn new(
        source: Option<Arc<dyn PlaylistSource>>,
        configs: Vec<CollectionConfig>,
        max_pages: usize,
    ) -> Self {
        Self {
            source,
            configs,
            max_pages: max_pages.max(1),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    pub async fn load(&self) -> Result<CollectionsLoad> {
        let Some(source) = self.source.as_deref() else {
            return Err(LibraryError::ConfigurationMissing(
                "YouTube API key is missing".into(),
            ));
        };

        let mut load = CollectionsLoad::default();
        for config in &self.configs {
            let Some(playlist_id) = config
                .playlist_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
            else {
                warn!(collection = %config.id, "collection has no playlist, skipping");
                continue;
            };

            let (items, error) =
                fetch_playlist_items(source, playlist_id, self.max_pages).await;
            let collection = assemble_collection(config, &items);
            info!(
                collection = %collection.id,
                videos = collection.videos.len(),
                partial = error.is_some(),
                "collection assembled"
            );
            if let Some(error) = error {
                load.error = Some(error);
            }
            load.collections.push(collection);
        }

        Ok(load)
    }

    /// One aggregation pass published into `cache`.
    pub async fn run(&self, cache: &CollectionCache) {
        cache.init();
        match self.load().await {
            Ok(load) => cache.set(load),
            Err(LibraryError::ConfigurationMissing(reason)) => {
                cache.fail(LoadFailure::Unconfigured(reason));
            }
            Err(err) => cache.fail(LoadFailure::Error(err.to_string())),
        }
    }
}
