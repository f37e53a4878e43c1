use serde::{Deserialize, Serialize};

use super::matcher::{MatchedEntry, base_name};

/// Placeholder author shown for every book; the file store carries no author.
pub const DEFAULT_AUTHOR: &str = "មិនមានព័ទ្ធិមាន";

/// Shown when an audio item or video has no usable description.
pub const DESCRIPTION_FALLBACK: &str = "មិនមានព័ទ្ធិមានពិស្តារទេ";

/// A file as listed by the file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_id: String,
    pub name: String,
    #[serde(default)]
    pub file_path: String,
    pub url: String,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl FileDescriptor {
    /// File name without its final extension, trimmed.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Lower-cased extension after the final dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rfind('.')
            .map(|idx| self.name[idx + 1..].trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// True when `extensions` is empty or contains this file's extension.
    pub fn has_extension_in(&self, extensions: &[String]) -> bool {
        if extensions.is_empty() {
            return true;
        }
        match self.extension() {
            Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }
}

/// File type filter understood by the file store listing API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Image,
    NonImage,
    #[default]
    All,
}

impl FileKind {
    pub fn as_query(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::NonImage => "non-image",
            FileKind::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub pdf_url: String,
    pub cover_image_url: Option<String>,
    pub category: String,
    pub author: String,
    pub views: u64,
}

impl Book {
    pub fn from_entry(entry: MatchedEntry, views: u64) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            pdf_url: entry.primary_url,
            cover_image_url: entry.aux.map(|file| file.url),
            category: entry.category,
            author: DEFAULT_AUTHOR.to_string(),
            views,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    pub id: String,
    pub title: String,
    pub src: String,
    pub cover_image_url: Option<String>,
    pub description: String,
    pub likes: u64,
}

impl AudioTrack {
    /// `description` is the fetched text of the matched description file;
    /// blank text falls back to [`DESCRIPTION_FALLBACK`].
    pub fn from_entry(
        entry: MatchedEntry,
        description: Option<&str>,
        likes: u64,
    ) -> Self {
        let description = description
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(DESCRIPTION_FALLBACK)
            .to_string();

        Self {
            id: entry.id,
            title: entry.title,
            src: entry.primary_url,
            cover_image_url: None,
            description,
            likes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileDescriptor {
        FileDescriptor {
            file_id: "id".into(),
            name: name.into(),
            file_path: format!("/x/{name}"),
            url: format!("https://cdn/{name}"),
            file_type: None,
        }
    }

    #[test]
    fn extension_is_case_insensitive() {
        let f = file("Track.MP3");
        assert_eq!(f.extension().as_deref(), Some("mp3"));
        assert!(f.has_extension_in(&["mp3".into(), "wav".into()]));
        assert!(!f.has_extension_in(&["ogg".into()]));
        assert!(f.has_extension_in(&[]));
    }

    #[test]
    fn file_without_extension_only_passes_unfiltered() {
        let f = file("README");
        assert_eq!(f.extension(), None);
        assert!(!f.has_extension_in(&["txt".into()]));
    }

    #[test]
    fn audio_blank_description_uses_fallback() {
        let entry = MatchedEntry {
            id: "a".into(),
            title: "A".into(),
            primary_url: "https://cdn/a.mp3".into(),
            aux: None,
            category: String::new(),
        };
        let track = AudioTrack::from_entry(entry, Some("   "), 3);
        assert_eq!(track.description, DESCRIPTION_FALLBACK);
        assert_eq!(track.likes, 3);
        assert_eq!(track.cover_image_url, None);
    }

    #[test]
    fn file_descriptor_reads_file_store_json() {
        let raw = r#"{"fileId":"f1","name":"a.pdf","filePath":"/AllBook/a.pdf","url":"https://ik/a.pdf","fileType":"non-image","size":10}"#;
        let parsed: FileDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.file_id, "f1");
        assert_eq!(parsed.file_type.as_deref(), Some("non-image"));
    }
}
