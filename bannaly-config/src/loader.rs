use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::debug;

use crate::collections;
use crate::models::sources::{EnvConfig, FileConfig, FileImageKitAccount};
use crate::models::{
    CatalogConfig, CollectionsConfig, CollectionsSource, Config,
    ConfigMetadata, CorsConfig, DEFAULT_HOST, DEFAULT_MAX_PLAYLIST_PAGES,
    DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, FirestoreConfig, FirestoreCredentials,
    HttpConfig, ImageKitAccount, ImageKitConfig, ServerConfig, StorageBackend,
    StorageConfig, YOUTUBE_KEY_PLACEHOLDER, YouTubeConfig,
};
use crate::validation::{self, ConfigGuardRailError, ConfigWarnings};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("bannaly.toml"),
        PathBuf::from("config/bannaly.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        compose_config(file_config, env_config, config_path, env_file_loaded)
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        debug!(path = %path.display(), "reading configuration file");
        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
                path: path.clone(),
                source,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

/// Merge file and environment values over the defaults, then run the guard
/// rails. Environment values win over the file.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<ConfigLoad, ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No bannaly.toml detected; using environment variables and defaults",
            "Create bannaly.toml or set BANNALY_CONFIG_PATH to customise folders, categories or collections",
        );
    }

    let FileConfig {
        server: file_server,
        cors: file_cors,
        dev_mode: file_dev_mode,
        imagekit: file_imagekit,
        catalog: file_catalog,
        firestore: file_firestore,
        storage: file_storage,
        youtube: file_youtube,
        collections: file_collections,
        http: file_http,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .clone()
            .or(file_cors.allowed_origins)
            .unwrap_or_else(default_cors_origins),
        allow_credentials: env
            .cors_allow_credentials
            .or(file_cors.allow_credentials)
            .unwrap_or(false),
    };

    let dev_mode = env
        .dev_mode
        .or(file_dev_mode)
        .or_else(|| {
            env.node_env
                .as_deref()
                .map(|mode| !mode.eq_ignore_ascii_case("production"))
        })
        .unwrap_or(false);

    let imagekit = ImageKitConfig {
        books: resolve_account(
            env.imagekit_public_key.clone(),
            env.imagekit_private_key.clone(),
            env.imagekit_url_endpoint.clone(),
            file_imagekit.books,
        ),
        audio: resolve_account(
            env.audio_imagekit_public_key.clone(),
            env.audio_imagekit_private_key.clone(),
            env.audio_imagekit_url_endpoint.clone(),
            file_imagekit.audio,
        ),
    };

    let defaults = CatalogConfig::default();
    let mut description_concurrency = env
        .description_concurrency
        .or(file_catalog.description_concurrency)
        .unwrap_or(defaults.description_concurrency);
    if description_concurrency == 0 {
        warnings.push("Description fetch concurrency of 0 raised to 1");
        description_concurrency = 1;
    }
    let catalog = CatalogConfig {
        book_folder: file_catalog.book_folder.unwrap_or(defaults.book_folder),
        cover_folder: file_catalog.cover_folder.unwrap_or(defaults.cover_folder),
        audio_folder: file_catalog.audio_folder.unwrap_or(defaults.audio_folder),
        description_folder: file_catalog
            .description_folder
            .unwrap_or(defaults.description_folder),
        book_extensions: normalize_extensions(
            file_catalog.book_extensions.unwrap_or(defaults.book_extensions),
        ),
        audio_extensions: normalize_extensions(
            file_catalog.audio_extensions.unwrap_or(defaults.audio_extensions),
        ),
        description_extensions: normalize_extensions(
            file_catalog
                .description_extensions
                .unwrap_or(defaults.description_extensions),
        ),
        category_rules: file_catalog
            .category_rules
            .unwrap_or(defaults.category_rules),
        default_category: file_catalog
            .default_category
            .unwrap_or(defaults.default_category),
        description_concurrency,
        unknown_id_refresh_secs: file_catalog
            .unknown_id_refresh_secs
            .unwrap_or(defaults.unknown_id_refresh_secs),
    };

    let firestore = FirestoreConfig {
        credentials: env
            .firebase_service_account
            .clone()
            .map(FirestoreCredentials::Inline)
            .or_else(|| {
                env.firebase_service_account_key_path
                    .clone()
                    .map(FirestoreCredentials::KeyFile)
            })
            .or_else(|| {
                file_firestore
                    .service_account_path
                    .map(FirestoreCredentials::KeyFile)
            }),
    };

    let env_backend = match env.storage_backend.as_deref() {
        Some(raw) => Some(raw.parse::<StorageBackend>().map_err(|_| {
            ConfigLoadError::InvalidValue {
                key: "STORAGE_BACKEND",
                value: raw.to_string(),
            }
        })?),
        None => None,
    };
    let storage = StorageConfig {
        backend: env_backend.or(file_storage.backend),
    };

    let youtube = YouTubeConfig {
        api_key: env
            .youtube_api_key
            .clone()
            .or(file_youtube.api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != YOUTUBE_KEY_PLACEHOLDER),
        max_pages: env
            .youtube_max_pages
            .or(file_youtube.max_pages)
            .unwrap_or(DEFAULT_MAX_PLAYLIST_PAGES)
            .max(1),
    };

    let collections = match env.collections_path.clone().or(file_collections.path) {
        Some(path) => CollectionsConfig {
            entries: collections::load_file(&path)?,
            source: CollectionsSource::File(path),
        },
        None => CollectionsConfig {
            entries: collections::bundled()?,
            source: CollectionsSource::Bundled,
        },
    };

    let http = HttpConfig {
        timeout: Duration::from_secs(
            env.http_timeout_secs
                .or(file_http.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
                .max(1),
        ),
    };

    let config = Config {
        server,
        cors,
        dev_mode,
        imagekit,
        catalog,
        firestore,
        storage,
        youtube,
        collections,
        http,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
        },
    };

    warnings.extend(validation::apply_guard_rails(&config)?);
    Ok(ConfigLoad { config, warnings })
}

fn resolve_account(
    env_public: Option<String>,
    env_private: Option<String>,
    env_url: Option<String>,
    file: FileImageKitAccount,
) -> Option<ImageKitAccount> {
    let non_empty = |value: Option<String>| {
        value
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    };

    let private_key = non_empty(env_private.or(file.private_key))?;
    Some(ImageKitAccount {
        public_key: non_empty(env_public.or(file.public_key)).unwrap_or_default(),
        private_key,
        url_endpoint: non_empty(env_url.or(file.url_endpoint)).unwrap_or_default(),
    })
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://bannalydigital.netlify.app".to_string(),
    ]
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("bundled collection list is invalid")]
    BundledCollections {
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::sources::{
        FileCatalogConfig, FileServerConfig, FileStorageConfig,
        FileYouTubeConfig,
    };

    fn compose(file: Option<FileConfig>, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        compose_config(file, env, None, false)
    }

    #[test]
    fn defaults_without_any_source() {
        let ConfigLoad { config, warnings } =
            compose(None, EnvConfig::default()).unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.dev_mode);
        assert!(config.imagekit.books.is_none());
        assert_eq!(config.catalog.book_folder, "/AllBook");
        assert_eq!(config.catalog.description_concurrency, 16);
        assert_eq!(config.catalog.unknown_id_refresh_secs, 30);
        assert_eq!(config.collections.source, CollectionsSource::Bundled);
        assert_eq!(config.collections.entries.len(), 11);
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert_eq!(config.storage.backend, None);
        assert!(warnings.contains("No bannaly.toml"));
        assert!(warnings.contains("YouTube API key is missing"));
    }

    #[test]
    fn environment_wins_over_file() {
        let file = FileConfig {
            server: FileServerConfig {
                host: Some("127.0.0.1".into()),
                port: Some(8080),
            },
            youtube: FileYouTubeConfig {
                api_key: Some("file-key".into()),
                max_pages: Some(3),
            },
            catalog: FileCatalogConfig {
                book_folder: Some("/Books".into()),
                book_extensions: Some(vec![".PDF".into(), " ".into()]),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = EnvConfig {
            server_port: Some(9000),
            youtube_api_key: Some("env-key".into()),
            ..Default::default()
        };

        let config = compose(Some(file), env).unwrap().config;
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.youtube.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.youtube.max_pages, 3);
        assert_eq!(config.catalog.book_folder, "/Books");
        assert_eq!(config.catalog.book_extensions, vec!["pdf".to_string()]);
    }

    #[test]
    fn placeholder_youtube_key_is_absent() {
        let env = EnvConfig {
            youtube_api_key: Some(YOUTUBE_KEY_PLACEHOLDER.into()),
            ..Default::default()
        };
        assert!(compose(None, env).unwrap().config.youtube.api_key.is_none());
    }

    #[test]
    fn node_env_drives_dev_mode_when_unset() {
        let env = EnvConfig {
            node_env: Some("development".into()),
            ..Default::default()
        };
        assert!(compose(None, env).unwrap().config.dev_mode);

        let env = EnvConfig {
            node_env: Some("production".into()),
            ..Default::default()
        };
        assert!(!compose(None, env).unwrap().config.dev_mode);

        let env = EnvConfig {
            node_env: Some("development".into()),
            dev_mode: Some(false),
            ..Default::default()
        };
        assert!(!compose(None, env).unwrap().config.dev_mode);
    }

    #[test]
    fn imagekit_account_requires_private_key() {
        let env = EnvConfig {
            imagekit_public_key: Some("public".into()),
            audio_imagekit_private_key: Some("private".into()),
            ..Default::default()
        };
        let ConfigLoad { config, warnings } = compose(None, env).unwrap();
        assert!(config.imagekit.books.is_none());
        let audio = config.imagekit.audio.unwrap();
        assert_eq!(audio.private_key, "private");
        assert!(warnings.contains("Audio ImageKit account has a private key"));
    }

    #[test]
    fn firestore_without_credentials_fails_outside_dev_mode() {
        let file = FileConfig {
            storage: FileStorageConfig {
                backend: Some(StorageBackend::Firestore),
            },
            ..Default::default()
        };
        let err = compose(Some(file.clone()), EnvConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::GuardRail(ConfigGuardRailError::FirestoreCredentialsMissing)
        ));

        let dev = EnvConfig {
            dev_mode: Some(true),
            ..Default::default()
        };
        let load = compose(Some(file), dev).unwrap();
        assert!(load.warnings.contains("Firestore selected without credentials"));
    }

    #[test]
    fn invalid_backend_is_rejected() {
        let env = EnvConfig {
            storage_backend: Some("postgres".into()),
            ..Default::default()
        };
        assert!(matches!(
            compose(None, env),
            Err(ConfigLoadError::InvalidValue { key: "STORAGE_BACKEND", .. })
        ));
    }

    #[test]
    fn wildcard_cors_with_credentials_is_fatal() {
        let env = EnvConfig {
            cors_allowed_origins: Some(vec!["*".into()]),
            cors_allow_credentials: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            compose(None, env),
            Err(ConfigLoadError::GuardRail(
                ConfigGuardRailError::WildcardCorsWithCredentials
            ))
        ));
    }

    #[test]
    fn firebase_inline_json_wins_over_key_path() {
        let env = EnvConfig {
            firebase_service_account: Some("{}".into()),
            firebase_service_account_key_path: Some(PathBuf::from("/keys/sa.json")),
            ..Default::default()
        };
        let config = compose(None, env).unwrap().config;
        assert!(matches!(
            config.firestore.credentials,
            Some(FirestoreCredentials::Inline(_))
        ));
    }

    #[test]
    fn explicit_missing_config_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new()
            .with_config_path(dir.path().join("absent.toml"))
            .with_env_file(dir.path().join(".env"));
        assert!(matches!(
            loader.load(),
            Err(ConfigLoadError::MissingConfig { .. })
        ));
    }

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
dev_mode = true

[server]
port = 4100

[catalog]
default_category = "Other"
unknown_id_refresh_secs = 5
category_rules = [{{ prefix = "novel ", category = "Novels" }}]

[storage]
backend = "memory"
"#
        )
        .unwrap();

        let loader = ConfigLoader::new().with_config_path(file.path());
        let (parsed, path) = loader
            .load_file_config(&EnvConfig::default())
            .unwrap();
        let parsed = parsed.unwrap();
        assert_eq!(path.as_deref(), Some(file.path()));
        assert_eq!(parsed.server.port, Some(4100));
        assert_eq!(parsed.dev_mode, Some(true));
        assert_eq!(parsed.storage.backend, Some(StorageBackend::Memory));

        let config = compose(Some(parsed), EnvConfig::default()).unwrap().config;
        let rules = config.catalog.category_rules();
        assert_eq!(rules.classify("Novel one"), "Novels");
        assert_eq!(rules.classify("Atlas"), "Other");
        assert_eq!(config.catalog.unknown_id_refresh_secs, 5);
    }
}
