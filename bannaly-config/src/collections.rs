//! The list of curated collections shown on the video page.

use std::fs;
use std::path::Path;

use bannaly_core::domain::collections::CollectionConfig;
use serde::Deserialize;

use crate::loader::ConfigLoadError;

const BUNDLED_COLLECTIONS: &str = include_str!("../resources/collections.toml");

#[derive(Debug, Deserialize)]
struct CollectionsFile {
    #[serde(default)]
    collections: Vec<CollectionConfig>,
}

/// The collections compiled into the binary.
pub fn bundled() -> Result<Vec<CollectionConfig>, ConfigLoadError> {
    toml::from_str::<CollectionsFile>(BUNDLED_COLLECTIONS)
        .map(|file| file.collections)
        .map_err(|source| ConfigLoadError::BundledCollections { source })
}

pub fn load_file(path: &Path) -> Result<Vec<CollectionConfig>, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str::<CollectionsFile>(&contents)
        .map(|file| file.collections)
        .map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
