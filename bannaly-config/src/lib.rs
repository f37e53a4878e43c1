//! Configuration for the Bannaly backend.
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional `bannaly.toml`, and the process environment (after `.env` is
//! applied). [`ConfigLoader`] composes them and runs the guard rails in
//! [`validation`].

pub mod collections;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    CatalogConfig, CollectionsConfig, CollectionsSource, Config,
    ConfigMetadata, CorsConfig, FirestoreConfig, FirestoreCredentials,
    HttpConfig, ImageKitAccount, ImageKitConfig, ServerConfig, StorageBackend,
    StorageConfig, YouTubeConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
