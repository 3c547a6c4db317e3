//! Parent-record layouts and the fields that encode them.

use common::storage::{ContentHash, Record};
use serde::Serialize;

use crate::encoder::EncodedAsset;
use crate::kind::AssetKind;

pub const USE_SUBCOLLECTION: &str = "useSubcollection";
pub const CHUNK_COUNT: &str = "chunkCount";
pub const VIDEO_URL: &str = "videoUrl";
pub const IMAGE_URL: &str = "imageUrl";
pub const PAYLOAD_LENGTH: &str = "payloadLength";
pub const PAYLOAD_SHA256: &str = "payloadSha256";

const LEGACY_CHUNK_PREFIX: &str = "chunk";

/// Index `i` of a legacy `chunk{i}` field name on a parent record.
///
/// Only canonical names match: `chunk01` is not chunk 1.
pub fn legacy_chunk_index(key: &str) -> Option<u64> {
    let digits = key.strip_prefix(LEGACY_CHUNK_PREFIX)?;
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

fn is_legacy_chunk_field(key: &str) -> bool {
    key.strip_prefix(LEGACY_CHUNK_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Where a parent record keeps its asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum AssetLayout {
    /// Whole payload in `videoUrl` / `imageUrl`.
    Inline { kind: AssetKind },
    /// Payload in `chunk0..chunkN-1` fields of the parent itself.
    InlineChunked { count: u64 },
    /// Payload in a fragment subcollection.
    Subcollection { count: u64 },
}

impl AssetLayout {
    /// Decide the layout of a stored parent record, or `None` if it holds no
    /// asset.
    ///
    /// `useSubcollection` is checked first: a record flagged that way is read
    /// from the subcollection whatever else it carries. A record explicitly
    /// flagged `false` with an empty inline field is an empty inline asset,
    /// which is what an upload of an empty payload writes.
    pub fn from_record(record: &Record) -> Option<Self> {
        let flag = record.get_bool(USE_SUBCOLLECTION);
        if flag == Some(true) {
            return Some(Self::Subcollection {
                count: record.get_u64(CHUNK_COUNT).unwrap_or(0),
            });
        }
        if let Some(count) = record.get_u64(CHUNK_COUNT).filter(|n| *n > 0) {
            return Some(Self::InlineChunked { count });
        }
        const KINDS: [AssetKind; 2] = [AssetKind::Video, AssetKind::Image];
        KINDS
            .into_iter()
            .find(|kind| {
                record
                    .get_str(kind.inline_field())
                    .is_some_and(|v| !v.is_empty())
            })
            .or_else(|| {
                KINDS
                    .into_iter()
                    .filter(|_| flag == Some(false))
                    .find(|kind| record.get_str(kind.inline_field()).is_some())
            })
            .map(|kind| Self::Inline { kind })
    }

    /// Layout an encoded asset will have once written.
    pub fn for_encoded(asset: &EncodedAsset, kind: AssetKind) -> Self {
        match asset {
            EncodedAsset::Inline(_) => Self::Inline { kind },
            EncodedAsset::Subcollection { fragments } => Self::Subcollection {
                count: fragments.len() as u64,
            },
        }
    }

    pub fn uses_subcollection(&self) -> bool {
        matches!(self, Self::Subcollection { .. })
    }

    /// Remove every layout and integrity field, leaving the record's other
    /// fields (title, description, ...) alone.
    pub fn clear_fields(record: &mut Record) {
        record.remove_where(|key| {
            matches!(
                key,
                USE_SUBCOLLECTION
                    | CHUNK_COUNT
                    | VIDEO_URL
                    | IMAGE_URL
                    | PAYLOAD_LENGTH
                    | PAYLOAD_SHA256
            ) || is_legacy_chunk_field(key)
        });
    }
}

/// Parent-record fields describing `asset`, including its length and digest.
pub fn layout_fields(asset: &EncodedAsset, kind: AssetKind) -> Record {
    let mut record = Record::new();
    match asset {
        EncodedAsset::Inline(value) => {
            record
                .set(USE_SUBCOLLECTION, false)
                .set(kind.inline_field(), value.as_str())
                .set(PAYLOAD_SHA256, ContentHash::compute(value.as_bytes()).to_hex());
        }
        EncodedAsset::Subcollection { fragments } => {
            record
                .set(USE_SUBCOLLECTION, true)
                .set(CHUNK_COUNT, fragments.len() as u64)
                .set(PAYLOAD_SHA256, ContentHash::compute_parts(fragments).to_hex());
        }
    }
    record.set(PAYLOAD_LENGTH, asset.stored_len() as u64);
    record
}
