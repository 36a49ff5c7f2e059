//! Adapter over the device-local string key-value store. Pure pass-through:
//! no merging, no migration, last write wins.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::Result;

/// Keys persisted across app restarts.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const PROFILE_COMPLETED: &str = "profileCompleted";
    pub const SECRET_CODE_VERIFIED: &str = "secretCodeVerified";
    pub const THEME_MODE: &str = "themeMode";
    pub const ACCENT_COLOR: &str = "accentColor";
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// Read a boolean flag. Only the literal string `"true"` reads as set.
    async fn get_flag(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.as_deref() == Some("true"))
    }

    /// Write a boolean flag as `"true"` or `"false"`.
    async fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, if value { "true" } else { "false" }).await
    }
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// A store backed by a single JSON object on disk. The whole file is
/// rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: AsyncMutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable JSON file is an
    /// empty store; it is overwritten on the next write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Discarding unreadable store at {}: {e}", path.display());
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened key-value store at {}", path.display());
        Ok(Self {
            path,
            entries: AsyncMutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling file and rename it into place, so the store file
    /// is never left half written.
    async fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flags_are_literal_strings() {
        let store = MemoryStore::new();
        assert!(!store.get_flag(keys::PROFILE_COMPLETED).await.unwrap());

        store.set_flag(keys::PROFILE_COMPLETED, true).await.unwrap();
        assert_eq!(
            store.get(keys::PROFILE_COMPLETED).await.unwrap().as_deref(),
            Some("true")
        );
        assert!(store.get_flag(keys::PROFILE_COMPLETED).await.unwrap());

        store.set(keys::PROFILE_COMPLETED, "yes").await.unwrap();
        assert!(!store.get_flag(keys::PROFILE_COMPLETED).await.unwrap());

        store.set_flag(keys::PROFILE_COMPLETED, false).await.unwrap();
        assert_eq!(
            store.get(keys::PROFILE_COMPLETED).await.unwrap().as_deref(),
            Some("false")
        );
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get(keys::TOKEN).await.unwrap(), None);
        store.set(keys::TOKEN, "abc").await.unwrap();
        store.set(keys::THEME_MODE, "dark").await.unwrap();
        store.remove(keys::THEME_MODE).await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(keys::TOKEN).await.unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get(keys::THEME_MODE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn truncated_file_opens_empty_and_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, br#"{"token": "ab"#).await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get(keys::TOKEN).await.unwrap(), None);
        store.set(keys::THEME_MODE, "dark").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(keys::THEME_MODE).await.unwrap().as_deref(), Some("dark"));
        assert!(!dir.path().join("store.json.tmp").exists());
    }
}
