use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageError;
use super::path::{CollectionPath, RecordPath};
use super::record::{Document, Record};

/// Hierarchical document store: records addressed by path, grouped into
/// collections that may nest under other records.
///
/// Every operation is an independent round trip. Nothing spans records: there
/// are no transactions and no ordering between concurrent writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully replace the record at `path`.
    async fn put_record(&self, path: &RecordPath, record: Record) -> Result<(), StorageError>;

    /// Fetch the record at `path`, or `None` if it does not exist.
    async fn get_record(&self, path: &RecordPath) -> Result<Option<Record>, StorageError>;

    /// List every record directly inside `collection`.
    ///
    /// With `order_by`, results are sorted ascending by that field. Without it
    /// the order is unspecified.
    async fn list_records(
        &self,
        collection: &CollectionPath,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StorageError>;

    /// Delete the record at `path`.
    ///
    /// Returns `true` if the record was deleted, `false` if it did not exist.
    /// Records in subcollections beneath it are not touched.
    async fn delete_record(&self, path: &RecordPath) -> Result<bool, StorageError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn put_record(&self, path: &RecordPath, record: Record) -> Result<(), StorageError> {
        (**self).put_record(path, record).await
    }

    async fn get_record(&self, path: &RecordPath) -> Result<Option<Record>, StorageError> {
        (**self).get_record(path).await
    }

    async fn list_records(
        &self,
        collection: &CollectionPath,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StorageError> {
        (**self).list_records(collection, order_by).await
    }

    async fn delete_record(&self, path: &RecordPath) -> Result<bool, StorageError> {
        (**self).delete_record(path).await
    }
}
