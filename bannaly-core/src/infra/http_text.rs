use async_trait::async_trait;

use super::http::ensure_success;
use crate::error::Result;
use crate::ports::TextFetcher;

/// Plain GET for small text blobs such as audio descriptions.
#[derive(Debug, Clone)]
pub struct HttpTextFetcher {
    http: reqwest::Client,
}

impl HttpTextFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TextFetcher for HttpTextFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?;
        let response = ensure_success("text fetch", response).await?;
        Ok(response.text().await?)
    }
}
