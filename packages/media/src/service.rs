use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::storage::{ContentHash, DocumentStore, Record};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::{ChunkingConfig, IntegrityMode};
use crate::decoder::{extract_legacy_fragments, reconstruct_base64};
use crate::encoder::{EncodedAsset, encode};
use crate::error::{MediaError, Result};
use crate::fragments::FragmentStore;
use crate::kind::AssetKind;
use crate::layout::{AssetLayout, CHUNK_COUNT, PAYLOAD_LENGTH, PAYLOAD_SHA256, layout_fields};

/// What an upload stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub layout: AssetLayout,
    pub fragment_count: usize,
    /// Characters stored, after any truncation.
    pub stored_length: usize,
    pub truncated_chars: usize,
}

/// Stored state of an asset, read without reassembling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub id: String,
    pub layout: Option<AssetLayout>,
    pub chunk_count: Option<u64>,
    /// Fragment records actually present in the subcollection.
    pub stored_fragments: usize,
    pub payload_length: Option<u64>,
    pub payload_sha256: Option<String>,
}

/// Upload, replace, read and remove flows over a [`DocumentStore`].
///
/// The service holds only configuration; the store is passed to each call.
#[derive(Debug, Clone)]
pub struct AssetService {
    config: ChunkingConfig,
    fragments: FragmentStore,
}

impl AssetService {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        let fragments = FragmentStore::from_config(&config);
        Ok(Self { config, fragments })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn fragments(&self) -> &FragmentStore {
        &self.fragments
    }

    /// Store a base64 payload as the asset of parent `id`, replacing whatever
    /// layout the parent had before.
    ///
    /// Old fragments are removed before anything new is written; a failure
    /// there is logged and does not stop the upload. Other fields of an
    /// existing parent record are kept.
    #[instrument(skip(self, store, payload), fields(payload_len = payload.len()))]
    pub async fn upload<S>(
        &self,
        store: &S,
        id: &str,
        kind: AssetKind,
        payload: &str,
    ) -> Result<UploadReceipt>
    where
        S: DocumentStore + ?Sized,
    {
        let encoding = encode(payload, &self.config)?;
        let parent_path = self.fragments.parent_path(id)?;

        match self.fragments.delete(store, id).await {
            Ok(summary) if summary.failed > 0 => {
                warn!(failed = summary.failed, "Some old fragments could not be deleted");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not clear old fragments"),
        }

        if let EncodedAsset::Subcollection { fragments } = &encoding.asset {
            self.fragments.save(store, id, fragments).await?;
        }

        let mut record = store.get_record(&parent_path).await?.unwrap_or_default();
        AssetLayout::clear_fields(&mut record);
        record.merge(layout_fields(&encoding.asset, kind));
        store.put_record(&parent_path, record).await?;

        let receipt = UploadReceipt {
            layout: AssetLayout::for_encoded(&encoding.asset, kind),
            fragment_count: encoding.asset.fragment_count(),
            stored_length: encoding.asset.stored_len(),
            truncated_chars: encoding.truncated_chars,
        };
        info!(
            layout = ?receipt.layout,
            fragments = receipt.fragment_count,
            truncated = receipt.truncated_chars,
            "Asset stored"
        );
        Ok(receipt)
    }

    /// Base64-encode raw bytes and [`upload`](Self::upload) them.
    pub async fn upload_bytes<S>(
        &self,
        store: &S,
        id: &str,
        kind: AssetKind,
        bytes: &[u8],
    ) -> Result<UploadReceipt>
    where
        S: DocumentStore + ?Sized,
    {
        let payload = STANDARD.encode(bytes);
        self.upload(store, id, kind, &payload).await
    }

    /// Reassemble the base64 payload of parent `id`.
    ///
    /// Subcollection parents are read through the fragment store, every other
    /// layout from the parent's own fields. A parent without an asset yields
    /// the empty string.
    #[instrument(skip(self, store))]
    pub async fn read<S>(&self, store: &S, id: &str) -> Result<String>
    where
        S: DocumentStore + ?Sized,
    {
        let record = self.parent_record(store, id).await?;

        let fragments = match AssetLayout::from_record(&record) {
            None => return Ok(String::new()),
            Some(AssetLayout::Subcollection { count }) => {
                let fragments = self.fragments.load(store, id).await?;
                if fragments.len() as u64 != count {
                    warn!(
                        expected = count,
                        found = fragments.len(),
                        "Fragment count does not match chunkCount"
                    );
                }
                fragments
            }
            Some(_) => extract_legacy_fragments(&record),
        };

        let payload = reconstruct_base64(&fragments);
        self.verify(id, &record, &payload)?;
        Ok(payload)
    }

    /// [`read`](Self::read) and base64-decode.
    pub async fn read_bytes<S>(&self, store: &S, id: &str) -> Result<Vec<u8>>
    where
        S: DocumentStore + ?Sized,
    {
        let payload = self.read(store, id).await?;
        Ok(STANDARD.decode(payload)?)
    }

    /// Delete the asset's fragments, then the parent record itself.
    ///
    /// Returns whether the parent existed.
    #[instrument(skip(self, store))]
    pub async fn remove<S>(&self, store: &S, id: &str) -> Result<bool>
    where
        S: DocumentStore + ?Sized,
    {
        let summary = self.fragments.delete(store, id).await?;
        if summary.failed > 0 {
            warn!(failed = summary.failed, "Some fragments could not be deleted");
        }
        let existed = store.delete_record(&self.fragments.parent_path(id)?).await?;
        info!(existed, fragments = summary.deleted, "Asset removed");
        Ok(existed)
    }

    /// Describe how parent `id` stores its asset.
    pub async fn inspect<S>(&self, store: &S, id: &str) -> Result<AssetSummary>
    where
        S: DocumentStore + ?Sized,
    {
        let record = self.parent_record(store, id).await?;
        Ok(AssetSummary {
            id: id.to_string(),
            layout: AssetLayout::from_record(&record),
            chunk_count: record.get_u64(CHUNK_COUNT),
            stored_fragments: self.fragments.count(store, id).await?,
            payload_length: record.get_u64(PAYLOAD_LENGTH),
            payload_sha256: record.get_str(PAYLOAD_SHA256).map(str::to_owned),
        })
    }

    async fn parent_record<S>(&self, store: &S, id: &str) -> Result<Record>
    where
        S: DocumentStore + ?Sized,
    {
        let path = self.fragments.parent_path(id)?;
        store
            .get_record(&path)
            .await?
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    /// Compare the reassembled payload with the stored length and digest.
    ///
    /// Records written before these fields existed are not checked.
    fn verify(&self, id: &str, record: &Record, payload: &str) -> Result<()> {
        if self.config.integrity == IntegrityMode::Off {
            return Ok(());
        }

        let expected_length = record.get_u64(PAYLOAD_LENGTH);
        let expected_sha256 = record.get_str(PAYLOAD_SHA256);
        if expected_length.is_none() && expected_sha256.is_none() {
            return Ok(());
        }

        let actual_length = payload.chars().count();
        let length_ok = expected_length.is_none_or(|n| n == actual_length as u64);
        let digest_ok = expected_sha256.is_none_or(|hex| {
            ContentHash::from_hex(hex)
                .is_ok_and(|expected| expected == ContentHash::compute(payload.as_bytes()))
        });
        if length_ok && digest_ok {
            return Ok(());
        }

        match self.config.integrity {
            IntegrityMode::Enforce => Err(MediaError::IntegrityMismatch {
                id: id.to_string(),
                expected_length,
                expected_sha256: expected_sha256.map(str::to_owned),
                actual_length,
            }),
            _ => {
                warn!(
                    ?expected_length,
                    actual_length, "Reassembled payload does not match stored integrity fields"
                );
                Ok(())
            }
        }
    }
}
