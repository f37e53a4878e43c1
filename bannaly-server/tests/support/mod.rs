//! Test harness: the real router over in-memory stores and scripted fakes of
//! the file store, text host and playlist API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum_test::TestServer;
use bannaly_config::{EnvConfig, StorageBackend, loader::compose_config};
use bannaly_core::domain::catalog::FileDescriptor;
use bannaly_core::domain::collections::{
    CollectionConfig, PlaylistItem, PlaylistPage, PlaylistSnippet, ResourceId,
    Thumbnail, Thumbnails,
};
use bannaly_core::domain::comments::Comment;
use bannaly_core::infra::{InMemoryCommentStore, InMemoryCounterStore};
use bannaly_core::ports::{FileStore, ListFilesQuery, PlaylistSource, TextFetcher};
use bannaly_core::{LibraryError, Result as LibraryResult};
use bannaly_server::{
    AppState, create_app,
    infra::{
        startup::StartupHooks,
        wiring::{Collaborators, Stores, assemble},
    },
};

/// Replace the single `{param}` placeholder in a route template.
pub fn fill(template: &str, value: &str) -> String {
    match (template.find('{'), template.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{}{}", &template[..start], value, &template[end + 1..])
        }
        _ => template.to_string(),
    }
}

pub fn file(id: &str, folder: &str, name: &str) -> FileDescriptor {
    FileDescriptor {
        file_id: id.into(),
        name: name.into(),
        file_path: format!("{folder}/{name}"),
        url: format!("https://ik.example{folder}/{name}"),
        file_type: None,
    }
}

/// Folder path to files, filtered by the query's extensions like the real
/// client does.
#[derive(Debug, Default, Clone)]
pub struct FakeFiles {
    folders: HashMap<String, Vec<FileDescriptor>>,
    failing: bool,
}

impl FakeFiles {
    pub fn with_folder(mut self, folder: &str, files: Vec<FileDescriptor>) -> Self {
        self.folders.insert(folder.to_string(), files);
        self
    }

    pub fn failing() -> Self {
        Self {
            folders: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl FileStore for FakeFiles {
    async fn list_files(&self, query: ListFilesQuery) -> LibraryResult<Vec<FileDescriptor>> {
        if self.failing {
            return Err(LibraryError::upstream("imagekit", "HTTP 502 Bad Gateway"));
        }
        Ok(self
            .folders
            .get(&query.folder)
            .into_iter()
            .flatten()
            .filter(|file| file.has_extension_in(&query.extensions))
            .cloned()
            .collect())
    }
}

/// URL to body; unknown URLs fail.
#[derive(Debug, Default, Clone)]
pub struct FakeText {
    bodies: HashMap<String, String>,
}

impl FakeText {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl TextFetcher for FakeText {
    async fn fetch_text(&self, url: &str) -> LibraryResult<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| LibraryError::upstream("text", format!("HTTP 404 for {url}")))
    }
}

/// Playlist id to its pages. Page `n` is requested with token `page-n`;
/// a `None` page fails.
#[derive(Debug, Default, Clone)]
pub struct FakePlaylists {
    playlists: HashMap<String, Vec<Option<Vec<PlaylistItem>>>>,
}

impl FakePlaylists {
    pub fn with(mut self, playlist_id: &str, pages: Vec<Option<Vec<PlaylistItem>>>) -> Self {
        self.playlists.insert(playlist_id.to_string(), pages);
        self
    }
}

#[async_trait]
impl PlaylistSource for FakePlaylists {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> LibraryResult<PlaylistPage> {
        let pages = self
            .playlists
            .get(playlist_id)
            .ok_or_else(|| LibraryError::upstream("youtube", "playlistNotFound"))?;
        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| LibraryError::upstream("youtube", "invalid page token"))?,
        };

        match pages.get(index) {
            Some(Some(items)) => Ok(PlaylistPage {
                items: items.clone(),
                next_page_token: (index + 1 < pages.len())
                    .then(|| format!("page-{}", index + 1)),
            }),
            Some(None) => Err(LibraryError::upstream("youtube", "quotaExceeded")),
            None => Ok(PlaylistPage::default()),
        }
    }
}

pub fn video(id: &str, title: &str, thumbnail: Option<&str>) -> PlaylistItem {
    PlaylistItem {
        snippet: Some(PlaylistSnippet {
            title: Some(title.into()),
            description: Some(format!("about {title}")),
            thumbnails: Thumbnails {
                high: thumbnail.map(|url| Thumbnail { url: url.into() }),
                ..Default::default()
            },
            resource_id: Some(ResourceId {
                video_id: Some(id.into()),
            }),
        }),
    }
}

pub fn collection(id: &str, playlist_id: Option<&str>) -> CollectionConfig {
    CollectionConfig {
        id: id.into(),
        title: format!("Collection {id}"),
        description: String::new(),
        thumbnail: None,
        playlist_id: playlist_id.map(str::to_string),
    }
}

#[derive(Debug, Default)]
pub struct TestOptions {
    pub dev_mode: bool,
    pub books: Option<FakeFiles>,
    pub audio: Option<FakeFiles>,
    pub text: FakeText,
    pub playlists: Option<FakePlaylists>,
    pub collections: Vec<CollectionConfig>,
    pub views: Vec<(String, u64)>,
    pub likes: Vec<(String, u64)>,
    pub comments: Vec<Comment>,
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub async fn build_test_app<H: StartupHooks>(
    options: TestOptions,
    hooks: &H,
) -> Result<TestApp> {
    let env = EnvConfig {
        dev_mode: Some(options.dev_mode),
        storage_backend: Some("memory".into()),
        ..Default::default()
    };
    let mut config = compose_config(None, env, None, false)?.config;
    config.collections.entries = options.collections;

    let stores = Stores {
        views: Arc::new(InMemoryCounterStore::with_values(options.views)),
        likes: Arc::new(InMemoryCounterStore::with_values(options.likes)),
        comments: Arc::new(InMemoryCommentStore::with_comments(options.comments)),
        backend: StorageBackend::Memory,
    };
    let collaborators = Collaborators {
        books: options
            .books
            .map(|files| Arc::new(files) as Arc<dyn FileStore>),
        audio: options
            .audio
            .map(|files| Arc::new(files) as Arc<dyn FileStore>),
        text: Arc::new(options.text),
        playlists: options
            .playlists
            .map(|source| Arc::new(source) as Arc<dyn PlaylistSource>),
    };

    let services = assemble(&config, collaborators, stores);
    let state = AppState::new(Arc::new(config), services);
    hooks.run(&state).await?;

    let server = TestServer::new(create_app(state.clone()))
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok(TestApp { server, state })
}
