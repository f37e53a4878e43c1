use tracing::warn;

use super::types::{Collection, CollectionConfig, PlaylistItem, VideoRecord};
use crate::domain::catalog::DESCRIPTION_FALLBACK;

pub const EMBED_URL_PREFIX: &str = "https://www.youtube.com/embed/";

pub fn embed_url(video_id: &str) -> String {
    format!("{EMBED_URL_PREFIX}{video_id}?rel=0&showinfo=0")
}

/// Title used when a playlist entry has none; `position` is 1-based.
pub fn untitled_video(position: usize) -> String {
    format!("វីដេអូទី {position}")
}

/// Normalize one raw playlist entry. `index` is the entry's 0-based position
/// in the raw playlist. Entries without a video id yield `None`.
pub fn to_video_record(item: &PlaylistItem, index: usize) -> Option<VideoRecord> {
    let snippet = item.snippet.as_ref()?;
    let video_id = snippet
        .resource_id
        .as_ref()
        .and_then(|resource| resource.video_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())?;

    let title = snippet
        .title
        .as_deref()
        .filter(|title| !title.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| untitled_video(index + 1));

    let description = snippet
        .description
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(DESCRIPTION_FALLBACK)
        .to_string();

    Some(VideoRecord {
        id: video_id.to_string(),
        title,
        description,
        thumbnail_url: snippet.thumbnails.best_url().map(str::to_string),
        embed_url: embed_url(video_id),
    })
}

/// Build a collection from its config and the raw items of its playlist.
pub fn assemble_collection(
    config: &CollectionConfig,
    items: &[PlaylistItem],
) -> Collection {
    let videos: Vec<VideoRecord> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = to_video_record(item, index);
            if record.is_none() {
                warn!(
                    collection = %config.id,
                    position = index,
                    "skipping playlist item without a video id"
                );
            }
            record
        })
        .collect();

    let thumbnail = config
        .thumbnail
        .clone()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| videos.first().and_then(|v| v.thumbnail_url.clone()));

    Collection {
        id: config.id.clone(),
        title: config.title.clone(),
        description: config.description.clone(),
        thumbnail,
        videos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collections::types::{
        PlaylistSnippet, ResourceId, Thumbnail, Thumbnails,
    };

    fn item(video_id: Option<&str>, title: Option<&str>) -> PlaylistItem {
        PlaylistItem {
            snippet: Some(PlaylistSnippet {
                title: title.map(str::to_string),
                description: None,
                thumbnails: Thumbnails::default(),
                resource_id: Some(ResourceId {
                    video_id: video_id.map(str::to_string),
                }),
            }),
        }
    }

    fn config(thumbnail: Option<&str>) -> CollectionConfig {
        CollectionConfig {
            id: "a1".into(),
            title: "Maths".into(),
            description: "Grade 1".into(),
            thumbnail: thumbnail.map(str::to_string),
            playlist_id: Some("PL1".into()),
        }
    }

    #[test]
    fn missing_video_id_is_dropped() {
        let items = [item(Some("v1"), Some("One")), item(None, Some("Two"))];
        let collection = assemble_collection(&config(Some("t.jpg")), &items);
        assert_eq!(collection.videos.len(), 1);
        assert_eq!(collection.videos[0].id, "v1");
    }

    #[test]
    fn missing_thumbnail_is_none_and_defaults_apply() {
        let record = to_video_record(&item(Some("v9"), None), 2).unwrap();
        assert_eq!(record.thumbnail_url, None);
        assert_eq!(record.title, "វីដេអូទី 3");
        assert_eq!(record.description, DESCRIPTION_FALLBACK);
        assert_eq!(
            record.embed_url,
            "https://www.youtube.com/embed/v9?rel=0&showinfo=0"
        );
    }

    #[test]
    fn thumbnail_prefers_highest_tier() {
        let mut entry = item(Some("v1"), Some("One"));
        if let Some(snippet) = entry.snippet.as_mut() {
            snippet.thumbnails = Thumbnails {
                default_tier: Some(Thumbnail { url: "d".into() }),
                medium: Some(Thumbnail { url: "m".into() }),
                high: None,
                standard: Some(Thumbnail { url: "s".into() }),
                maxres: None,
            };
        }
        let record = to_video_record(&entry, 0).unwrap();
        assert_eq!(record.thumbnail_url.as_deref(), Some("s"));
    }

    #[test]
    fn collection_thumbnail_falls_back_to_first_video() {
        let mut first = item(Some("v1"), Some("One"));
        if let Some(snippet) = first.snippet.as_mut() {
            snippet.thumbnails.high = Some(Thumbnail {
                url: "first.jpg".into(),
            });
        }
        let collection = assemble_collection(&config(None), &[first]);
        assert_eq!(collection.thumbnail.as_deref(), Some("first.jpg"));

        let empty = assemble_collection(&config(None), &[]);
        assert_eq!(empty.thumbnail, None);
    }

    #[test]
    fn item_without_snippet_is_dropped() {
        assert!(to_video_record(&PlaylistItem { snippet: None }, 0).is_none());
    }
}
