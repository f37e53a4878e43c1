use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::http::ensure_success;
use crate::domain::catalog::FileDescriptor;
use crate::error::Result;
use crate::ports::{FileStore, ListFilesQuery};

const IMAGEKIT_API_BASE: &str = "https://api.imagekit.io/v1";
const LIST_PAGE_SIZE: usize = 1000;
// Folder listings in practice fit in a handful of pages.
const MAX_LIST_PAGES: usize = 100;

/// Credentials of one ImageKit account. Only the private key authenticates
/// listing calls; the other two are kept for diagnostics.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageKitCredentials {
    pub public_key: String,
    pub private_key: String,
    pub url_endpoint: String,
}

impl fmt::Debug for ImageKitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageKitCredentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("url_endpoint", &self.url_endpoint)
            .finish()
    }
}

/// File listing client for one ImageKit account.
#[derive(Debug, Clone)]
pub struct ImageKitClient {
    http: reqwest::Client,
    credentials: ImageKitCredentials,
    base_url: String,
    account: String,
}

impl ImageKitClient {
    pub fn new(
        http: reqwest::Client,
        credentials: ImageKitCredentials,
        account: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            base_url: IMAGEKIT_API_BASE.to_string(),
            account: account.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn list_page(
        &self,
        query: &ListFilesQuery,
        skip: usize,
    ) -> Result<Vec<FileDescriptor>> {
        let url = format!("{}/files", self.base_url);
        let limit = LIST_PAGE_SIZE.to_string();
        let skip = skip.to_string();

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.private_key, Some(""))
            .query(&[
                ("path", query.folder.as_str()),
                ("type", "file"),
                ("fileType", query.kind.as_query()),
                ("limit", limit.as_str()),
                ("skip", skip.as_str()),
            ])
            .send()
            .await?;

        let response = ensure_success("imagekit", response).await?;
        Ok(response.json::<Vec<FileDescriptor>>().await?)
    }
}

#[async_trait]
impl FileStore for ImageKitClient {
    async fn list_files(
        &self,
        query: ListFilesQuery,
    ) -> Result<Vec<FileDescriptor>> {
        let mut files = Vec::new();

        for page in 0..MAX_LIST_PAGES {
            let batch = self.list_page(&query, files.len()).await?;
            let fetched = batch.len();
            files.extend(batch);

            if fetched < LIST_PAGE_SIZE {
                break;
            }
            if page + 1 == MAX_LIST_PAGES {
                warn!(
                    account = %self.account,
                    folder = %query.folder,
                    "file listing stopped at page limit"
                );
            }
        }

        let total = files.len();
        files.retain(|file| file.has_extension_in(&query.extensions));
        debug!(
            account = %self.account,
            folder = %query.folder,
            total,
            kept = files.len(),
            "listed files"
        );
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_private_key() {
        let credentials = ImageKitCredentials {
            public_key: "public_abc".into(),
            private_key: "private_secret".into(),
            url_endpoint: "https://ik.imagekit.io/demo".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("public_abc"));
        assert!(!rendered.contains("private_secret"));
    }

    #[test]
    fn listing_payload_decodes() {
        let body = r#"[{
            "type": "file",
            "fileId": "f1",
            "name": "សៀវភៅ A.pdf",
            "filePath": "/AllBook/សៀវភៅ A.pdf",
            "url": "https://ik.imagekit.io/demo/AllBook/a.pdf",
            "fileType": "non-image",
            "size": 1024
        }]"#;
        let files: Vec<FileDescriptor> = serde_json::from_str(body).unwrap();
        assert_eq!(files[0].file_id, "f1");
        assert_eq!(files[0].extension().as_deref(), Some("pdf"));
    }
}
