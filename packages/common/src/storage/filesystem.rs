use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::path::{CollectionPath, RecordPath};
use super::record::{Document, Record, compare_field};
use super::traits::DocumentStore;

const RECORD_EXTENSION: &str = "json";

/// Filesystem-backed document store.
///
/// Each record is one JSON file; collections are directories:
/// `videos/v1` → `{base_path}/videos/v1.json`,
/// `videos/v1/chunks/chunk0` → `{base_path}/videos/v1/chunks/chunk0.json`.
pub struct FilesystemDocumentStore {
    base_path: PathBuf,
    max_record_size: u64,
}

impl FilesystemDocumentStore {
    /// Create a new filesystem document store rooted at `base_path`.
    pub async fn new(base_path: PathBuf, max_record_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_record_size,
        })
    }

    fn collection_dir(&self, collection: &CollectionPath) -> PathBuf {
        let mut dir = self.base_path.clone();
        dir.extend(collection.segments());
        dir
    }

    fn record_file(&self, path: &RecordPath) -> PathBuf {
        self.collection_dir(&path.parent())
            .join(format!("{}.{RECORD_EXTENSION}", path.id()))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl DocumentStore for FilesystemDocumentStore {
    async fn put_record(&self, path: &RecordPath, record: Record) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&record)?;
        if bytes.len() as u64 > self.max_record_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: bytes.len() as u64,
                limit: self.max_record_size,
            });
        }

        let record_file = self.record_file(path);
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = record_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &record_file).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get_record(&self, path: &RecordPath) -> Result<Option<Record>, StorageError> {
        match fs::read(self.record_file(path)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_records(
        &self,
        collection: &CollectionPath,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StorageError> {
        let dir = self.collection_dir(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file = entry.path();
            if file.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(id) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let bytes = match fs::read(&file).await {
                Ok(bytes) => bytes,
                // Deleted between read_dir and read.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            documents.push(Document {
                id: id.to_string(),
                record: serde_json::from_slice(&bytes)?,
            });
        }

        match order_by {
            Some(field) => {
                documents.sort_by(|a, b| compare_field(a.record.get(field), b.record.get(field)))
            }
            None => documents.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        Ok(documents)
    }

    async fn delete_record(&self, path: &RecordPath) -> Result<bool, StorageError> {
        match fs::remove_file(self.record_file(path)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
