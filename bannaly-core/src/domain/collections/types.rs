use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

/// Static description of one collection, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "playlistId")]
    pub playlist_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub embed_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub videos: Vec<VideoRecord>,
}

/// Result of one aggregation pass. `error` records the last per-playlist
/// failure; collections affected by it hold whatever was fetched before it.
#[derive(Debug, Default)]
pub struct CollectionsLoad {
    pub collections: Vec<Collection>,
    pub error: Option<LibraryError>,
}

/// One page of playlist items as returned by the video API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: Option<PlaylistSnippet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default, rename = "default")]
    pub default_tier: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub standard: Option<Thumbnail>,
    #[serde(default)]
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// URL of the highest resolution tier present.
    pub fn best_url(&self) -> Option<&str> {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default_tier,
        ]
        .into_iter()
        .flatten()
        .map(|thumb| thumb.url.as_str())
        .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_video_api_page() {
        let raw = r#"{
            "kind": "youtube#playlistItemListResponse",
            "nextPageToken": "CAUQAA",
            "items": [{
                "snippet": {
                    "title": "Lesson 1",
                    "description": "",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/d.jpg", "width": 120},
                        "high": {"url": "https://i.ytimg.com/h.jpg"}
                    },
                    "resourceId": {"kind": "youtube#video", "videoId": "abc123"}
                }
            }]
        }"#;

        let page: PlaylistPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("CAUQAA"));
        let snippet = page.items[0].snippet.as_ref().unwrap();
        assert_eq!(
            snippet.resource_id.as_ref().and_then(|r| r.video_id.as_deref()),
            Some("abc123")
        );
        assert_eq!(
            snippet.thumbnails.best_url(),
            Some("https://i.ytimg.com/h.jpg")
        );
    }

    #[test]
    fn collection_config_accepts_both_key_styles() {
        let toml_style: CollectionConfig = serde_json::from_str(
            r#"{"id":"a1","title":"T","playlist_id":"PL1"}"#,
        )
        .unwrap();
        let js_style: CollectionConfig = serde_json::from_str(
            r#"{"id":"a1","title":"T","playlistId":"PL1"}"#,
        )
        .unwrap();
        assert_eq!(toml_style, js_style);
        assert_eq!(toml_style.thumbnail, None);
    }
}
