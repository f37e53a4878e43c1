use async_trait::async_trait;

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextFetcher: Send + Sync {
    /// Body of the resource at `url` decoded as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
