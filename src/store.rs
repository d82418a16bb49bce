//! Snapshot persistence.
//!
//! The snapshot is a single JSON file that is fully replaced by every run.
//! Readers either see the previous file, no file (between `clear` and
//! `write`), or the complete new file: `write` goes through a temporary
//! sibling and an atomic rename.

use crate::error::PersistenceError;
use crate::models::NewsItem;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Persistence primitive for the published snapshot.
pub trait Store {
    async fn clear(&self) -> Result<(), PersistenceError>;
    async fn write(&self, items: &[NewsItem]) -> Result<(), PersistenceError>;
}

/// [`Store`] backed by a pretty-printed UTF-8 JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Four-space indented JSON, non-ASCII written as-is.
pub fn to_pretty_json(items: &[NewsItem]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    items.serialize(&mut ser)?;
    Ok(buf)
}

impl Store for JsonFileStore {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Cleared previous snapshot");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(&self.path, e)),
        }
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = items.len()))]
    async fn write(&self, items: &[NewsItem]) -> Result<(), PersistenceError> {
        let json = to_pretty_json(items)?;

        // Write to a sibling first so readers never see a partial file
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &json)
            .await
            .map_err(|e| self.io_error(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(self.io_error(&self.path, e));
        }

        info!(bytes = json.len(), "Wrote snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("district_news_store_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn item(title: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: "https://example.com".to_string(),
            date: "Mon, 19 Oct 2026 06:30:00 GMT".to_string(),
            image: "https://via.placeholder.com/300x200?text=Latur+News".to_string(),
            is_logo: false,
            source: "News Portal".to_string(),
            description: "पाऊस".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_replaces_whole_file() {
        let dir = scratch("replace");
        let store = JsonFileStore::new(dir.join("news_data.json"));

        store.write(&[item("one"), item("two")]).await.unwrap();
        store.write(&[item("three")]).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Vec<NewsItem> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, vec![item("three")]);
        assert!(!dir.join("news_data.json.tmp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_output_is_indented_utf8() {
        let dir = scratch("format");
        let store = JsonFileStore::new(dir.join("news_data.json"));
        store.write(&[item("लातूर")]).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    {\n        \"title\": \"लातूर\""));
        assert!(!text.contains("\\u"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = scratch("clear");
        let store = JsonFileStore::new(dir.join("news_data.json"));

        store.clear().await.unwrap();
        store.write(&[item("one")]).await.unwrap();
        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = scratch("missing");
        let store = JsonFileStore::new(dir.join("absent").join("news_data.json"));
        let err = store.write(&[item("one")]).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_snapshot_is_empty_array() {
        assert_eq!(to_pretty_json(&[]).unwrap(), b"[]");
    }
}
