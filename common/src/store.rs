//! Flat-file storage for customer records.
//!
//! The whole collection lives in one JSON array on disk. Every mutation is a
//! full read-modify-write cycle; the cycles are serialized through a single
//! async mutex so that concurrent requests cannot drop each other's changes.
//! Writes go to a sibling staging file which is then renamed over the
//! document, so a reader never sees a half-written array.

use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs, sync::Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{error::StoreError, models::CustomerRecord};

pub struct RecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Opens the document at `path`, creating an empty collection if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let store = RecordStore {
            path,
            write_lock: Mutex::new(()),
        };

        let exists = fs::try_exists(&store.path)
            .await
            .map_err(|e| StoreError::io(&store.path, e))?;
        if !exists {
            info!(path = %store.path.display(), "Creating empty storage document");
            store.write(&[]).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full collection. A document removed after startup reads as empty.
    pub async fn load(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&self.path, e))
    }

    /// Replaces the stored collection with `records`.
    pub async fn save(&self, records: &[CustomerRecord]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(records).await
    }

    /// Appends one record and returns the new collection size.
    pub async fn append(&self, record: CustomerRecord) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let id = record.id;
        records.push(record);
        self.write(&records).await?;

        info!(record_id = %id, total = records.len(), "Appended customer record");
        Ok(records.len())
    }

    /// Removes the record at `index`. Out-of-range indices leave the document untouched.
    pub async fn remove_at(&self, index: usize) -> Result<Option<CustomerRecord>, StoreError> {
        self.remove_where(|records| (index < records.len()).then_some(index))
            .await
    }

    /// Removes the record carrying `id`, if any.
    pub async fn remove_by_id(&self, id: Uuid) -> Result<Option<CustomerRecord>, StoreError> {
        self.remove_where(|records| records.iter().position(|r| r.id == id))
            .await
    }

    async fn remove_where<F>(&self, locate: F) -> Result<Option<CustomerRecord>, StoreError>
    where
        F: FnOnce(&[CustomerRecord]) -> Option<usize>,
    {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let Some(index) = locate(records.as_slice()) else {
            debug!(total = records.len(), "No record matched, nothing removed");
            return Ok(None);
        };

        let removed = records.remove(index);
        self.write(&records).await?;

        info!(
            record_id = %removed.id,
            index,
            total = records.len(),
            "Removed customer record"
        );
        Ok(Some(removed))
    }

    async fn write(&self, records: &[CustomerRecord]) -> Result<(), StoreError> {
        let body =
            serde_json::to_vec_pretty(records).map_err(|e| StoreError::json(&self.path, e))?;

        let staging = self.staging_path();
        fs::write(&staging, body)
            .await
            .map_err(|e| StoreError::io(&staging, e))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}
