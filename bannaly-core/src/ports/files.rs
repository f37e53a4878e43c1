use async_trait::async_trait;

use crate::domain::catalog::{FileDescriptor, FileKind};
use crate::error::Result;

/// Folder listing request against a file store account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilesQuery {
    pub folder: String,
    pub kind: FileKind,
    /// Lower-case extensions to keep; empty keeps everything.
    pub extensions: Vec<String>,
}

impl ListFilesQuery {
    pub fn new(folder: impl Into<String>, kind: FileKind) -> Self {
        Self {
            folder: folder.into(),
            kind,
            extensions: Vec::new(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().to_lowercase())
            .collect();
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Every file in the queried folder, all remote pages concatenated.
    async fn list_files(
        &self,
        query: ListFilesQuery,
    ) -> Result<Vec<FileDescriptor>>;
}
