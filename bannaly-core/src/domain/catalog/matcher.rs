use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::FileDescriptor;

/// File name with its final extension removed, trimmed of surrounding
/// whitespace. A name without a dot is returned whole.
pub fn base_name(filename: &str) -> &str {
    let stem = match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    };
    stem.trim()
}

/// Key used to pair primary and auxiliary files: the lower-cased base name.
pub fn lookup_key(filename: &str) -> String {
    base_name(filename).to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub prefix: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(prefix: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            category: category.into(),
        }
    }
}

/// Ordered prefix rules; the first rule whose prefix starts the lower-cased
/// base name decides the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub rules: Vec<CategoryRule>,
    pub default_category: String,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new("រឿង ", "រឿងនិទាន"),
                CategoryRule::new("សៀវភៅកុំព្យូទ័រ ", "សៀវភៅកុំព្យូទ័រ"),
                CategoryRule::new("សៀវភៅ ", "សៀវភៅទូទៅ"),
                CategoryRule::new("ប្រវត្តិសាស្ត្រ ", "ប្រវត្តិសាស្ត្រ"),
            ],
            default_category: "ផ្សេងៗ".to_string(),
        }
    }
}

impl CategoryRules {
    pub fn classify(&self, base_name: &str) -> &str {
        let lowered = base_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.starts_with(&rule.prefix.to_lowercase()))
            .map(|rule| rule.category.as_str())
            .unwrap_or(&self.default_category)
    }
}

/// A primary file paired with its optional auxiliary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    pub id: String,
    /// Base name with original case preserved.
    pub title: String,
    pub primary_url: String,
    pub aux: Option<FileDescriptor>,
    pub category: String,
}

/// Pair every primary file with the auxiliary file sharing its base name
/// (case-insensitive). Auxiliary duplicates resolve last-write-wins; primary
/// files with an empty base name are skipped. Output order follows `primary`.
pub fn match_files(
    primary: &[FileDescriptor],
    aux: &[FileDescriptor],
    rules: &CategoryRules,
) -> Vec<MatchedEntry> {
    let mut aux_by_key: HashMap<String, &FileDescriptor> =
        HashMap::with_capacity(aux.len());
    for file in aux {
        let key = lookup_key(&file.name);
        if !key.is_empty() {
            aux_by_key.insert(key, file);
        }
    }

    let mut entries = Vec::with_capacity(primary.len());
    for file in primary {
        let title = file.base_name();
        if title.is_empty() {
            warn!(
                path = %file.file_path,
                "skipping file with empty base name"
            );
            continue;
        }

        let key = title.to_lowercase();
        entries.push(MatchedEntry {
            id: file.file_id.clone(),
            title: title.to_string(),
            primary_url: file.url.clone(),
            aux: aux_by_key.get(&key).map(|found| (*found).clone()),
            category: rules.classify(title).to_string(),
        });
    }

    entries
}
