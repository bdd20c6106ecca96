//! File-based Session Slot Adapter
//!
//! Stores each slot as one file under a base directory. File names are the
//! hex SHA-256 of the slot key, so any key maps to a portable file name.
//!
//! Writes go to a temporary file that is renamed over the target, so a
//! reader sees the old bytes or the new bytes and never a torn write. A
//! process-wide mutex serializes mutations, which makes `remove_if_eq` a
//! single step for every writer sharing this adapter.
//!
//! TTL hints are ignored; the accessor rejects expired records on read.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ports::{SessionSlot, SlotError, SlotKey};

/// File-based session slot storage
#[derive(Debug, Clone)]
pub struct FileSessionSlot {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionSlot {
    /// Create a new file slot store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let slot = FileSessionSlot::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a slot
    fn slot_path(&self, key: &SlotKey) -> PathBuf {
        let digest = Sha256::digest(key.as_str().as_bytes());
        self.base_path.join(format!("{}.session", hex::encode(digest)))
    }

    /// Ensure the base directory exists
    async fn ensure_dir(&self) -> Result<(), SlotError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SlotError::IoError(e.to_string()))
    }

    async fn read(path: &Path) -> Result<Option<Vec<u8>>, SlotError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlotError::IoError(e.to_string())),
        }
    }

    async fn delete(path: &Path) -> Result<(), SlotError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SlotError::IoError(e.to_string())),
        }
    }
}

#[async_trait]
impl SessionSlot for FileSessionSlot {
    async fn get(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, SlotError> {
        Self::read(&self.slot_path(key)).await
    }

    async fn set(
        &self,
        key: &SlotKey,
        value: Vec<u8>,
        _ttl: Option<Duration>,
    ) -> Result<(), SlotError> {
        self.ensure_dir().await?;
        let target = self.slot_path(key);
        let temp = self
            .base_path
            .join(format!(".{}.tmp", Uuid::new_v4().simple()));

        let _guard = self.write_lock.lock().await;

        fs::write(&temp, &value)
            .await
            .map_err(|e| SlotError::IoError(e.to_string()))?;

        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(SlotError::IoError(e.to_string()));
        }
        Ok(())
    }

    async fn remove(&self, key: &SlotKey) -> Result<(), SlotError> {
        let _guard = self.write_lock.lock().await;
        Self::delete(&self.slot_path(key)).await
    }

    async fn remove_if_eq(&self, key: &SlotKey, expected: &[u8]) -> Result<bool, SlotError> {
        let path = self.slot_path(key);
        let _guard = self.write_lock.lock().await;

        match Self::read(&path).await? {
            Some(current) if current == expected => {
                Self::delete(&path).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(s: &str) -> SlotKey {
        SlotKey::new(s)
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path());

        slot.set(&key("console:session:abc"), b"{\"a\":1}".to_vec(), None)
            .await
            .unwrap();

        assert_eq!(
            slot.get(&key("console:session:abc")).await.unwrap(),
            Some(b"{\"a\":1}".to_vec())
        );
    }

    #[tokio::test]
    async fn creates_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path().join("nested").join("sessions"));

        slot.set(&key("a"), b"x".to_vec(), None).await.unwrap();

        assert!(slot.base_path().is_dir());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path());
        assert_eq!(slot.get(&key("nope")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path());

        slot.set(&key("a"), b"first".to_vec(), None).await.unwrap();
        slot.set(&key("a"), b"second".to_vec(), None).await.unwrap();

        assert_eq!(slot.get(&key("a")).await.unwrap(), Some(b"second".to_vec()));
        let files: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path());

        slot.set(&key("a"), b"x".to_vec(), None).await.unwrap();
        slot.remove(&key("a")).await.unwrap();
        slot.remove(&key("a")).await.unwrap();

        assert_eq!(slot.get(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_if_eq_respects_current_value() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path());
        slot.set(&key("a"), b"new".to_vec(), None).await.unwrap();

        assert!(!slot.remove_if_eq(&key("a"), b"old").await.unwrap());
        assert!(slot.get(&key("a")).await.unwrap().is_some());

        assert!(slot.remove_if_eq(&key("a"), b"new").await.unwrap());
        assert_eq!(slot.get(&key("a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_a_new_adapter_instance() {
        let temp_dir = TempDir::new().unwrap();
        FileSessionSlot::new(temp_dir.path())
            .set(&key("a"), b"persisted".to_vec(), None)
            .await
            .unwrap();

        let reopened = FileSessionSlot::new(temp_dir.path());
        assert_eq!(
            reopened.get(&key("a")).await.unwrap(),
            Some(b"persisted".to_vec())
        );
    }

    #[tokio::test]
    async fn concurrent_writers_never_produce_torn_reads() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSessionSlot::new(temp_dir.path());
        let a = vec![b'a'; 64 * 1024];
        let b = vec![b'b'; 64 * 1024];

        let mut tasks = Vec::new();
        for i in 0..8 {
            let slot = slot.clone();
            let value = if i % 2 == 0 { a.clone() } else { b.clone() };
            tasks.push(tokio::spawn(async move {
                slot.set(&SlotKey::new("shared"), value, None).await.unwrap();
                slot.get(&SlotKey::new("shared")).await.unwrap()
            }));
        }

        for task in tasks {
            let read = task.await.unwrap().unwrap();
            assert!(read == a || read == b);
        }
    }
}
