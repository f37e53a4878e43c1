use thiserror::Error;

use crate::models::{Config, StorageBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.items
            .iter()
            .any(|warning| warning.message.contains(needle))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("wildcard CORS origin cannot be combined with credentials")]
    WildcardCorsWithCredentials,
    #[error(
        "storage backend 'firestore' selected but no Firebase service account is configured"
    )]
    FirestoreCredentialsMissing,
    #[error("server port must be non-zero")]
    InvalidPort,
}

/// Reject configurations that cannot run safely and collect warnings for
/// the ones that run degraded.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.server.port == 0 {
        return Err(ConfigGuardRailError::InvalidPort);
    }

    if config.cors.is_wildcard_included() {
        if config.cors.allow_credentials {
            return Err(ConfigGuardRailError::WildcardCorsWithCredentials);
        }
        warnings.push("CORS allows any origin");
    }

    let has_firestore = config.firestore.credentials.is_some();
    match config.storage.backend {
        Some(StorageBackend::Firestore) if !has_firestore => {
            if !config.dev_mode {
                return Err(ConfigGuardRailError::FirestoreCredentialsMissing);
            }
            warnings.push_with_hint(
                "Firestore selected without credentials; using in-memory counters and comments",
                "Set FIREBASE_SERVICE_ACCOUNT or FIREBASE_SERVICE_ACCOUNT_KEY_PATH",
            );
        }
        Some(StorageBackend::Memory) => {
            warnings.push("Counters and comments are kept in memory and lost on restart");
        }
        None if !has_firestore => {
            warnings.push_with_hint(
                "No Firebase service account configured; counters and comments are kept in memory",
                "Set FIREBASE_SERVICE_ACCOUNT or FIREBASE_SERVICE_ACCOUNT_KEY_PATH",
            );
        }
        _ => {}
    }

    if config.imagekit.books.is_none() {
        warnings.push_with_hint(
            "Book ImageKit account is not configured; book listing will fail",
            "Set IMAGEKIT_PUBLIC_KEY, IMAGEKIT_PRIVATE_KEY and IMAGEKIT_URL_ENDPOINT",
        );
    }
    if config.imagekit.audio.is_none() {
        warnings.push_with_hint(
            "Audio ImageKit account is not configured; audio listing will fail",
            "Set AUDIO_IMAGEKIT_PUBLIC_KEY, AUDIO_IMAGEKIT_PRIVATE_KEY and AUDIO_IMAGEKIT_URL_ENDPOINT",
        );
    }
    for (name, account) in [
        ("Book", config.imagekit.books.as_ref()),
        ("Audio", config.imagekit.audio.as_ref()),
    ] {
        if let Some(account) = account
            && (account.public_key.is_empty() || account.url_endpoint.is_empty())
        {
            warnings.push(format!(
                "{name} ImageKit account has a private key but no public key or URL endpoint"
            ));
        }
    }

    if config.youtube.api_key.is_none() {
        warnings.push_with_hint(
            "YouTube API key is missing; video collections will be unavailable",
            "Set YOUTUBE_API_KEY",
        );
    }

    let unlinked = config
        .collections
        .entries
        .iter()
        .filter(|entry| entry.playlist_id.is_none())
        .count();
    if unlinked > 0 {
        warnings.push(format!(
            "{unlinked} collection(s) have no playlist and will be skipped"
        ));
    }

    if config.dev_mode {
        warnings.push("Development mode is on; error responses include raw error detail");
    }

    Ok(warnings)
}
