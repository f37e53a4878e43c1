//! Builds the services from configuration: outbound HTTP client, file stores,
//! storage backend and the collection loader.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bannaly_config::{
    CatalogConfig, Config, FirestoreCredentials, ImageKitAccount,
    StorageBackend,
};
use bannaly_core::application::{
    CatalogService, CatalogSettings, CollectionLoader, CommentService,
};
use bannaly_core::domain::catalog::FileKind;
use bannaly_core::infra::firestore::{
    AUDIO_LIKES_COLLECTION, AUDIO_LIKES_FIELD, BOOK_VIEWS_COLLECTION,
    BOOK_VIEWS_FIELD, COMMENTS_COLLECTION, TokenProvider,
};
use bannaly_core::infra::{
    FirestoreClient, FirestoreCommentStore, FirestoreCounterStore,
    HttpTextFetcher, ImageKitClient, ImageKitCredentials, InMemoryCommentStore,
    InMemoryCounterStore, ServiceAccountKey, YouTubeClient, http,
};
use bannaly_core::ports::{
    CommentStore, CounterStore, FileStore, ListFilesQuery, PlaylistSource,
    TextFetcher,
};
use tracing::{info, warn};

use crate::infra::app_state::AppServices;

/// Counter and comment stores of one backend.
pub struct Stores {
    pub views: Arc<dyn CounterStore>,
    pub likes: Arc<dyn CounterStore>,
    pub comments: Arc<dyn CommentStore>,
    pub backend: StorageBackend,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            views: Arc::new(InMemoryCounterStore::new()),
            likes: Arc::new(InMemoryCounterStore::new()),
            comments: Arc::new(InMemoryCommentStore::new()),
            backend: StorageBackend::Memory,
        }
    }
}

/// Remote collaborators the services talk to. Tests substitute fakes.
pub struct Collaborators {
    pub books: Option<Arc<dyn FileStore>>,
    pub audio: Option<Arc<dyn FileStore>>,
    pub text: Arc<dyn TextFetcher>,
    pub playlists: Option<Arc<dyn PlaylistSource>>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("books", &self.books.is_some())
            .field("audio", &self.audio.is_some())
            .field("playlists", &self.playlists.is_some())
            .finish_non_exhaustive()
    }
}

pub fn wire_services(config: &Config) -> Result<AppServices> {
    let client = http::build_client(config.http.timeout)
        .context("failed to build outbound HTTP client")?;

    let collaborators = Collaborators {
        books: config
            .imagekit
            .books
            .as_ref()
            .map(|account| imagekit_store(&client, account, "books")),
        audio: config
            .imagekit
            .audio
            .as_ref()
            .map(|account| imagekit_store(&client, account, "audio")),
        text: Arc::new(HttpTextFetcher::new(client.clone())),
        playlists: config.youtube.api_key.as_ref().map(|key| {
            Arc::new(YouTubeClient::new(client.clone(), key.clone()))
                as Arc<dyn PlaylistSource>
        }),
    };

    let stores = build_stores(config, &client)?;
    Ok(assemble(config, collaborators, stores))
}

/// Combine collaborators and stores into the services, using the catalog and
/// collection settings from `config`.
pub fn assemble(
    config: &Config,
    collaborators: Collaborators,
    stores: Stores,
) -> AppServices {
    let Collaborators {
        books,
        audio,
        text,
        playlists,
    } = collaborators;

    let catalog = CatalogService::new(
        catalog_settings(&config.catalog),
        books,
        audio,
        text,
        stores.views,
        stores.likes,
    );

    let loader = CollectionLoader::new(
        playlists,
        config.collections.entries.clone(),
        config.youtube.max_pages,
    );

    AppServices {
        catalog,
        comments: CommentService::new(stores.comments),
        loader,
        storage: stores.backend,
    }
}

pub fn catalog_settings(catalog: &CatalogConfig) -> CatalogSettings {
    CatalogSettings {
        books: ListFilesQuery::new(&catalog.book_folder, FileKind::NonImage)
            .with_extensions(catalog.book_extensions.iter().cloned()),
        covers: ListFilesQuery::new(&catalog.cover_folder, FileKind::Image),
        audio: ListFilesQuery::new(&catalog.audio_folder, FileKind::NonImage)
            .with_extensions(catalog.audio_extensions.iter().cloned()),
        descriptions: ListFilesQuery::new(
            &catalog.description_folder,
            FileKind::NonImage,
        )
        .with_extensions(catalog.description_extensions.iter().cloned()),
        rules: catalog.category_rules(),
        description_concurrency: catalog.description_concurrency,
        unknown_id_refresh: Duration::from_secs(catalog.unknown_id_refresh_secs),
    }
}

fn imagekit_store(
    client: &reqwest::Client,
    account: &ImageKitAccount,
    name: &str,
) -> Arc<dyn FileStore> {
    let credentials = ImageKitCredentials {
        public_key: account.public_key.clone(),
        private_key: account.private_key.clone(),
        url_endpoint: account.url_endpoint.clone(),
    };
    Arc::new(ImageKitClient::new(client.clone(), credentials, name))
}

fn build_stores(config: &Config, client: &reqwest::Client) -> Result<Stores> {
    let explicit = config.storage.backend;
    let credentials = config.firestore.credentials.as_ref();

    match (explicit, credentials) {
        (Some(StorageBackend::Memory), _) | (None, None) => {
            info!("using in-memory counters and comments");
            Ok(Stores::in_memory())
        }
        (Some(StorageBackend::Firestore), None) => {
            // Guard rails only let this through in dev mode.
            warn!("Firestore selected without credentials; falling back to memory");
            Ok(Stores::in_memory())
        }
        (_, Some(credentials)) => match firestore_stores(client, credentials) {
            Ok(stores) => Ok(stores),
            Err(err)
                if explicit == Some(StorageBackend::Firestore)
                    && !config.dev_mode =>
            {
                Err(err)
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "Firestore unavailable; falling back to memory");
                Ok(Stores::in_memory())
            }
        },
    }
}

fn firestore_stores(
    client: &reqwest::Client,
    credentials: &FirestoreCredentials,
) -> Result<Stores> {
    let key = match credentials {
        FirestoreCredentials::Inline(raw) => ServiceAccountKey::from_json(raw)
            .context("FIREBASE_SERVICE_ACCOUNT is not a valid service account")?,
        FirestoreCredentials::KeyFile(path) => ServiceAccountKey::from_file(path)
            .with_context(|| {
                format!("failed to read service account key {}", path.display())
            })?,
    };
    let tokens = TokenProvider::new(client.clone(), key)
        .context("service account private key is invalid")?;
    let firestore = Arc::new(FirestoreClient::new(client.clone(), tokens));
    info!(project = firestore.project_id(), "using Firestore counters and comments");

    Ok(Stores {
        views: Arc::new(FirestoreCounterStore::new(
            Arc::clone(&firestore),
            BOOK_VIEWS_COLLECTION,
            BOOK_VIEWS_FIELD,
        )),
        likes: Arc::new(FirestoreCounterStore::new(
            Arc::clone(&firestore),
            AUDIO_LIKES_COLLECTION,
            AUDIO_LIKES_FIELD,
        )),
        comments: Arc::new(FirestoreCommentStore::new(
            firestore,
            COMMENTS_COLLECTION,
        )),
        backend: StorageBackend::Firestore,
    })
}
