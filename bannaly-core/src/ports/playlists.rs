use async_trait::async_trait;

use crate::domain::collections::PlaylistPage;
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// One page of playlist items; `page_token` is the cursor returned by the
    /// previous page, `None` for the first.
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistPage>;
}
