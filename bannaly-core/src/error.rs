use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    /// A required external credential or endpoint is not configured.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A remote collaborator (file store, document store, video API) failed.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LibraryError {
    pub fn upstream(service: &str, detail: impl std::fmt::Display) -> Self {
        Self::Upstream(format!("{service}: {detail}"))
    }

    /// True for failures caused by a remote call rather than by the request.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
