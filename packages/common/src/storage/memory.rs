use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::path::{CollectionPath, RecordPath};
use super::record::{Document, Record, compare_field};
use super::traits::DocumentStore;

/// In-process document store.
///
/// Records are kept in a `BTreeMap` keyed by path, so unordered listings come
/// back in lexical id order (`chunk10` before `chunk2`), the same way a
/// hosted store orders by document id.
pub struct MemoryDocumentStore {
    records: RwLock<BTreeMap<RecordPath, Record>>,
    max_record_size: u64,
}

impl MemoryDocumentStore {
    /// Create an empty store enforcing `max_record_size` bytes per record.
    pub fn new(max_record_size: u64) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            max_record_size,
        }
    }

    /// Total number of records held, across all collections.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

fn is_direct_child(collection: &CollectionPath, path: &RecordPath) -> bool {
    let parent = collection.segments();
    let segments = path.segments();
    segments.len() == parent.len() + 1 && segments.starts_with(parent)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put_record(&self, path: &RecordPath, record: Record) -> Result<(), StorageError> {
        let size = record.encoded_size()?;
        if size > self.max_record_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_record_size,
            });
        }

        self.records.write().await.insert(path.clone(), record);
        Ok(())
    }

    async fn get_record(&self, path: &RecordPath) -> Result<Option<Record>, StorageError> {
        Ok(self.records.read().await.get(path).cloned())
    }

    async fn list_records(
        &self,
        collection: &CollectionPath,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StorageError> {
        let mut documents: Vec<Document> = self
            .records
            .read()
            .await
            .iter()
            .filter(|(path, _)| is_direct_child(collection, path))
            .map(|(path, record)| Document {
                id: path.id().to_string(),
                record: record.clone(),
            })
            .collect();

        if let Some(field) = order_by {
            documents.sort_by(|a, b| compare_field(a.record.get(field), b.record.get(field)));
        }

        Ok(documents)
    }

    async fn delete_record(&self, path: &RecordPath) -> Result<bool, StorageError> {
        Ok(self.records.write().await.remove(path).is_some())
    }
}
