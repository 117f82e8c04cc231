use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key-value substrate for the preferences snapshot.
///
/// The store serializes its own state; backends only move strings. Swapping
/// the backend changes where preferences live without touching store logic.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-based backend. Each key becomes `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Storage file does not exist, starting fresh");
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        Ok(Some(content))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, value).await?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Saved snapshot to storage");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.load("missing").await.unwrap(), None);

        storage.save("key", "{\"a\":1}").await.unwrap();
        assert_eq!(
            storage.load("key").await.unwrap(),
            Some("{\"a\":1}".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.load("weather-app-storage").await.unwrap(), None);

        storage
            .save("weather-app-storage", "{\"favorites\":[]}")
            .await
            .unwrap();

        assert_eq!(
            storage.load("weather-app-storage").await.unwrap(),
            Some("{\"favorites\":[]}".to_string())
        );
        assert!(dir.path().join("weather-app-storage.json").exists());
    }

    #[tokio::test]
    async fn test_file_storage_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("clima");
        let storage = FileStorage::new(&nested);

        storage.save("weather-app-storage", "{}").await.unwrap();

        assert!(nested.join("weather-app-storage.json").exists());
    }

    #[tokio::test]
    async fn test_file_storage_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.save("key", "first").await.unwrap();
        storage.save("key", "second").await.unwrap();

        assert_eq!(storage.load("key").await.unwrap(), Some("second".to_string()));
    }
}
