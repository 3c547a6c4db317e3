use chrono::Utc;
use common::storage::{CollectionPath, DocumentStore, Record, RecordPath};
use futures::future::{join_all, try_join_all};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ChunkingConfig;
use crate::error::{MediaError, Result};

pub const INDEX: &str = "index";
pub const DATA: &str = "data";
pub const CREATED_AT: &str = "createdAt";

/// Outcome of [`FragmentStore::delete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub failed: usize,
}

/// Persists ordered fragment collections under parent records.
///
/// Fragments of parent `{id}` live at
/// `{collection}/{id}/{fragment_collection}/chunk{index}`. The store handle is
/// passed into every call.
#[derive(Debug, Clone)]
pub struct FragmentStore {
    collection: String,
    fragment_collection: String,
}

impl FragmentStore {
    pub fn new(collection: impl Into<String>, fragment_collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            fragment_collection: fragment_collection.into(),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(&config.collection, &config.fragment_collection)
    }

    pub fn parent_path(&self, parent_id: &str) -> Result<RecordPath> {
        Ok(RecordPath::new(&self.collection, parent_id)?)
    }

    pub fn fragments_path(&self, parent_id: &str) -> Result<CollectionPath> {
        Ok(self
            .parent_path(parent_id)?
            .collection(&self.fragment_collection)?)
    }

    pub fn fragment_path(&self, parent_id: &str, index: usize) -> Result<RecordPath> {
        Ok(self
            .fragments_path(parent_id)?
            .record(format!("chunk{index}"))?)
    }

    /// Write every fragment as its own child record.
    ///
    /// The writes run concurrently and are awaited together. The first failure
    /// fails the call; fragments already written stay behind.
    pub async fn save<S, T>(&self, store: &S, parent_id: &str, fragments: &[T]) -> Result<()>
    where
        S: DocumentStore + ?Sized,
        T: AsRef<str>,
    {
        let created_at = Utc::now().to_rfc3339();
        let writes = fragments
            .iter()
            .enumerate()
            .map(|(index, data)| -> Result<(RecordPath, Record)> {
                let path = self.fragment_path(parent_id, index)?;
                let record = Record::new()
                    .with(INDEX, index as u64)
                    .with(DATA, data.as_ref())
                    .with(CREATED_AT, created_at.as_str());
                Ok((path, record))
            })
            .collect::<Result<Vec<_>>>()?;

        try_join_all(
            writes
                .into_iter()
                .map(|(path, record)| async move { store.put_record(&path, record).await }),
        )
        .await?;

        debug!(parent_id, count = fragments.len(), "Fragments saved");
        Ok(())
    }

    /// Read all fragments of `parent_id` ordered by index.
    ///
    /// A parent without fragments yields an empty vector.
    pub async fn load<S>(&self, store: &S, parent_id: &str) -> Result<Vec<String>>
    where
        S: DocumentStore + ?Sized,
    {
        let documents = store
            .list_records(&self.fragments_path(parent_id)?, Some(INDEX))
            .await?;

        let mut indexed = documents
            .into_iter()
            .map(|doc| -> Result<(u64, String)> {
                let index = doc
                    .record
                    .get_u64(INDEX)
                    .ok_or_else(|| MediaError::MalformedFragment {
                        id: doc.id.clone(),
                        reason: format!("missing integer '{INDEX}' field"),
                    })?;
                let data = match doc.record.get_str(DATA) {
                    Some(data) => data.to_owned(),
                    None => {
                        return Err(MediaError::MalformedFragment {
                            id: doc.id,
                            reason: format!("missing string '{DATA}' field"),
                        });
                    }
                };
                Ok((index, data))
            })
            .collect::<Result<Vec<_>>>()?;

        // Not every backend honours order_by.
        indexed.sort_by_key(|(index, _)| *index);

        debug!(parent_id, count = indexed.len(), "Fragments loaded");
        Ok(indexed.into_iter().map(|(_, data)| data).collect())
    }

    /// Number of fragment records stored under `parent_id`.
    pub async fn count<S>(&self, store: &S, parent_id: &str) -> Result<usize>
    where
        S: DocumentStore + ?Sized,
    {
        Ok(store
            .list_records(&self.fragments_path(parent_id)?, None)
            .await?
            .len())
    }

    /// Delete every fragment of `parent_id`.
    ///
    /// Deletes run concurrently. A failed delete is logged and counted; it
    /// never stops the others. Only a failure to list the fragments is
    /// returned as an error.
    pub async fn delete<S>(&self, store: &S, parent_id: &str) -> Result<DeleteSummary>
    where
        S: DocumentStore + ?Sized,
    {
        let collection = self.fragments_path(parent_id)?;
        let documents = store.list_records(&collection, None).await?;
        if documents.is_empty() {
            return Ok(DeleteSummary::default());
        }

        let paths = documents
            .iter()
            .map(|doc| collection.record(doc.id.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let outcomes = join_all(paths.iter().map(|path| async move {
            let outcome = store.delete_record(path).await;
            (path, outcome)
        }))
        .await;

        let mut summary = DeleteSummary::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(_) => summary.deleted += 1,
                Err(e) => {
                    warn!(%path, error = %e, "Failed to delete fragment");
                    summary.failed += 1;
                }
            }
        }

        debug!(
            parent_id,
            deleted = summary.deleted,
            failed = summary.failed,
            "Fragments deleted"
        );
        Ok(summary)
    }
}
