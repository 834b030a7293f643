// JSON file implementation of the KeyValueStorage port.
//
// Purpose
// - Persist every item of the storage area in one JSON document on disk.
//
// Responsibilities
// - Treat a missing file as an empty storage area.
// - Treat a document that is not a JSON object as empty so the next write repairs it.
// - Write through a uniquely named, synced temporary file and rename it into place.
// - Enforce the per-item quota before touching the disk.

use crate::shared::infrastructure::key_value_storage::{
    KeyValueStorage, StorageError, check_quota,
};
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

pub struct JsonFileStorage {
    path: PathBuf,
    quota_bytes_per_item: Option<usize>,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>, quota_bytes_per_item: Option<usize>) -> Self {
        Self {
            path: path.into(),
            quota_bytes_per_item,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) | Err(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "storage document is not a JSON object, reading it as empty"
                );
                Ok(Map::new())
            }
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes))
            .await
            .map_err(io::Error::other)??;
        Ok(())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.into_temp_path().persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait::async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        check_quota(key, &value, self.quota_bytes_per_item)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }
}
