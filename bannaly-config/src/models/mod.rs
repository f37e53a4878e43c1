pub mod sources;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bannaly_core::domain::catalog::{CategoryRule, CategoryRules};
use bannaly_core::domain::collections::CollectionConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DESCRIPTION_CONCURRENCY: usize = 16;
pub const DEFAULT_UNKNOWN_ID_REFRESH_SECS: u64 = 30;
pub const DEFAULT_MAX_PLAYLIST_PAGES: usize = 200;

/// Value the setup guide tells users to replace; treated as no key.
pub const YOUTUBE_KEY_PLACEHOLDER: &str = "YOUR_COPIED_YOUTUBE_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub imagekit: ImageKitConfig,
    pub catalog: CatalogConfig,
    pub firestore: FirestoreConfig,
    pub storage: StorageConfig,
    pub youtube: YouTubeConfig,
    pub collections: CollectionsConfig,
    pub http: HttpConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

/// One ImageKit account. Present only when a private key is configured.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageKitAccount {
    pub public_key: String,
    pub private_key: String,
    pub url_endpoint: String,
}

impl fmt::Debug for ImageKitAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageKitAccount")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("url_endpoint", &self.url_endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageKitConfig {
    pub books: Option<ImageKitAccount>,
    pub audio: Option<ImageKitAccount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub book_folder: String,
    pub cover_folder: String,
    pub audio_folder: String,
    pub description_folder: String,
    pub book_extensions: Vec<String>,
    pub audio_extensions: Vec<String>,
    pub description_extensions: Vec<String>,
    pub category_rules: Vec<CategoryRule>,
    pub default_category: String,
    pub description_concurrency: usize,
    /// Minimum seconds between re-listings caused by unknown ids.
    pub unknown_id_refresh_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let rules = CategoryRules::default();
        Self {
            book_folder: "/AllBook".into(),
            cover_folder: "/AllCover".into(),
            audio_folder: "/AllAudio".into(),
            description_folder: "/AllDescription".into(),
            book_extensions: vec!["pdf".into()],
            audio_extensions: ["mp3", "ogg", "wav", "aac"]
                .into_iter()
                .map(String::from)
                .collect(),
            description_extensions: vec!["txt".into()],
            category_rules: rules.rules,
            default_category: rules.default_category,
            description_concurrency: DEFAULT_DESCRIPTION_CONCURRENCY,
            unknown_id_refresh_secs: DEFAULT_UNKNOWN_ID_REFRESH_SECS,
        }
    }
}

impl CatalogConfig {
    pub fn category_rules(&self) -> CategoryRules {
        CategoryRules {
            rules: self.category_rules.clone(),
            default_category: self.default_category.clone(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum FirestoreCredentials {
    /// Service-account JSON given directly in the environment.
    Inline(String),
    KeyFile(PathBuf),
}

impl fmt::Debug for FirestoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirestoreCredentials::Inline(_) => f.write_str("Inline(<redacted>)"),
            FirestoreCredentials::KeyFile(path) => {
                f.debug_tuple("KeyFile").field(path).finish()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FirestoreConfig {
    pub credentials: Option<FirestoreCredentials>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Firestore,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Firestore => "firestore",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "firestore" => Ok(StorageBackend::Firestore),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StorageConfig {
    /// `None` selects Firestore when credentials exist, memory otherwise.
    pub backend: Option<StorageBackend>,
}

#[derive(Clone)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub max_pages: usize,
}

impl fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionsSource {
    Bundled,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CollectionsConfig {
    pub entries: Vec<CollectionConfig>,
    pub source: CollectionsSource,
}

#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
