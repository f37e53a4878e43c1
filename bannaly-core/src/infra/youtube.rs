use async_trait::async_trait;

use super::http::ensure_success;
use crate::domain::collections::PlaylistPage;
use crate::error::Result;
use crate::ports::PlaylistSource;

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const PLAYLIST_PAGE_SIZE: &str = "50";

/// Reads playlist items from the YouTube Data API with an API key.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: YOUTUBE_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PlaylistSource for YouTubeClient {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistPage> {
        let url = format!("{}/playlistItems", self.base_url);
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", PLAYLIST_PAGE_SIZE),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            query.push(("pageToken", token));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let response = ensure_success("youtube", response).await?;
        Ok(response.json::<PlaylistPage>().await?)
    }
}
