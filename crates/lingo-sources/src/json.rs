//! Local JSON-directory translation source.
//!
//! Each language lives in `<directory>/<lang>.json`, a flat
//! `{"some.key": "Value", ...}` object. Useful for development and for
//! applications that ship their catalogs on disk.

use async_trait::async_trait;
use lingo_core::{error::LingoError, message::MessageEntry, traits::TranslationSource};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// Translation source reading `<lang>.json` files from a directory.
pub struct JsonSource {
    directory: PathBuf,
}

impl JsonSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl TranslationSource for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    async fn languages(&self) -> Result<Vec<String>, LingoError> {
        if !self.directory.exists() {
            tokio::fs::create_dir_all(&self.directory).await?;
        }
        let mut languages = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.directory).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    languages.push(stem.to_string());
                }
            }
        }
        languages.sort();
        Ok(languages)
    }

    async fn translations(&self, language: &str) -> Result<Vec<MessageEntry>, LingoError> {
        let path = self.directory.join(format!("{language}.json"));
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&path).await?;
        // BTreeMap keeps exports stable across loads.
        let data: BTreeMap<String, String> = match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                warn!("skipping malformed catalog {}: {e}", path.display());
                return Ok(Vec::new());
            }
        };
        Ok(data
            .into_iter()
            .map(|(key, value)| MessageEntry::new(language, key, value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_languages_lists_json_stems() {
        let dir = temp_dir("__lingo_json_langs__");
        std::fs::write(dir.join("en_US.json"), r#"{"greet":"Hello"}"#).unwrap();
        std::fs::write(dir.join("de_DE.json"), r#"{"greet":"Hallo"}"#).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let source = JsonSource::new(&dir);
        assert_eq!(source.languages().await.unwrap(), vec!["de_DE", "en_US"]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_languages_creates_missing_directory() {
        let dir = std::env::temp_dir().join("__lingo_json_missing__");
        let _ = std::fs::remove_dir_all(&dir);

        let source = JsonSource::new(&dir);
        assert!(source.languages().await.unwrap().is_empty());
        assert!(dir.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_translations_reads_flat_object() {
        let dir = temp_dir("__lingo_json_read__");
        std::fs::write(
            dir.join("en_US.json"),
            r#"{"greet":"Hello %name%!","bye":"Bye"}"#,
        )
        .unwrap();

        let source = JsonSource::new(&dir);
        let entries = source.translations("en_US").await.unwrap();
        assert_eq!(entries.len(), 2);
        let greet = entries.iter().find(|e| e.key == "greet").unwrap();
        assert_eq!(greet.language_code, "en_US");
        assert_eq!(greet.value, "Hello %name%!");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_unknown_language_is_empty_not_error() {
        let dir = temp_dir("__lingo_json_unknown__");
        let source = JsonSource::new(&dir);
        assert!(source.translations("fr_FR").await.unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_malformed_file_is_empty_not_error() {
        let dir = temp_dir("__lingo_json_malformed__");
        std::fs::write(dir.join("en_US.json"), "not json").unwrap();
        let source = JsonSource::new(&dir);
        assert!(source.translations("en_US").await.unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
