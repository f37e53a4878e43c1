use std::path::PathBuf;

use bannaly_core::domain::catalog::CategoryRule;
use serde::{Deserialize, Serialize};

use super::StorageBackend;
use crate::util::{non_empty_var, parse_bool_var, parse_csv_var, parse_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
    #[serde(default)]
    pub imagekit: FileImageKitConfig,
    #[serde(default)]
    pub catalog: FileCatalogConfig,
    #[serde(default)]
    pub firestore: FileFirestoreConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub youtube: FileYouTubeConfig,
    #[serde(default)]
    pub collections: FileCollectionsConfig,
    #[serde(default)]
    pub http: FileHttpConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileImageKitConfig {
    #[serde(default)]
    pub books: FileImageKitAccount,
    #[serde(default)]
    pub audio: FileImageKitAccount,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileImageKitAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_endpoint: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_rules: Option<Vec<CategoryRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_id_refresh_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileFirestoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileYouTubeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCollectionsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileHttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allow_credentials: Option<bool>,
    pub dev_mode: Option<bool>,
    pub node_env: Option<String>,
    pub imagekit_public_key: Option<String>,
    pub imagekit_private_key: Option<String>,
    pub imagekit_url_endpoint: Option<String>,
    pub audio_imagekit_public_key: Option<String>,
    pub audio_imagekit_private_key: Option<String>,
    pub audio_imagekit_url_endpoint: Option<String>,
    pub description_concurrency: Option<usize>,
    pub firebase_service_account: Option<String>,
    pub firebase_service_account_key_path: Option<PathBuf>,
    /// Raw value; parsed during composition so typos surface as errors.
    pub storage_backend: Option<String>,
    pub youtube_api_key: Option<String>,
    pub youtube_max_pages: Option<usize>,
    pub collections_path: Option<PathBuf>,
    pub http_timeout_secs: Option<u64>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var("BANNALY_CONFIG_PATH").map(PathBuf::from),
            server_host: non_empty_var("SERVER_HOST"),
            server_port: parse_var("SERVER_PORT").or_else(|| parse_var("PORT")),
            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            cors_allow_credentials: parse_bool_var("CORS_ALLOW_CREDENTIALS"),
            dev_mode: parse_bool_var("DEV_MODE"),
            node_env: non_empty_var("NODE_ENV"),
            imagekit_public_key: non_empty_var("IMAGEKIT_PUBLIC_KEY"),
            imagekit_private_key: non_empty_var("IMAGEKIT_PRIVATE_KEY"),
            imagekit_url_endpoint: non_empty_var("IMAGEKIT_URL_ENDPOINT"),
            audio_imagekit_public_key: non_empty_var("AUDIO_IMAGEKIT_PUBLIC_KEY"),
            audio_imagekit_private_key: non_empty_var(
                "AUDIO_IMAGEKIT_PRIVATE_KEY",
            ),
            audio_imagekit_url_endpoint: non_empty_var(
                "AUDIO_IMAGEKIT_URL_ENDPOINT",
            ),
            description_concurrency: parse_var("DESCRIPTION_FETCH_CONCURRENCY"),
            firebase_service_account: non_empty_var("FIREBASE_SERVICE_ACCOUNT"),
            firebase_service_account_key_path: non_empty_var(
                "FIREBASE_SERVICE_ACCOUNT_KEY_PATH",
            )
            .map(PathBuf::from),
            storage_backend: non_empty_var("STORAGE_BACKEND"),
            youtube_api_key: non_empty_var("YOUTUBE_API_KEY"),
            youtube_max_pages: parse_var("YOUTUBE_MAX_PAGES"),
            collections_path: non_empty_var("BANNALY_COLLECTIONS_PATH")
                .map(PathBuf::from),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS"),
        }
    }
}
