//! Reassembly of stored fragments back into a base64 payload.

use common::storage::Record;

use crate::layout::{CHUNK_COUNT, IMAGE_URL, VIDEO_URL, legacy_chunk_index};

/// Join fragments in the order given.
///
/// No sorting happens here; callers pass fragments already ordered by index.
pub fn reconstruct_base64<S: AsRef<str>>(fragments: &[S]) -> String {
    match fragments {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),
        _ => {
            let total = fragments.iter().map(|f| f.as_ref().len()).sum();
            let mut payload = String::with_capacity(total);
            for fragment in fragments {
                payload.push_str(fragment.as_ref());
            }
            payload
        }
    }
}

/// Fragments of a parent record stored in one of the legacy inline layouts.
///
/// `chunkCount > 0` reads `chunk0..chunkCount-1` in index order, skipping
/// absent fields. Otherwise a non-empty `videoUrl` or `imageUrl` is returned
/// as the single fragment. Anything else yields no fragments.
///
/// Work is bounded by the fields the record has, not by `chunkCount`.
pub fn extract_legacy_fragments(record: &Record) -> Vec<String> {
    if let Some(count) = record.get_u64(CHUNK_COUNT).filter(|n| *n > 0) {
        let mut chunks: Vec<(u64, &str)> = record
            .fields()
            .iter()
            .filter_map(|(key, value)| {
                let index = legacy_chunk_index(key).filter(|i| *i < count)?;
                Some((index, value.as_str()?))
            })
            .collect();
        chunks.sort_unstable_by_key(|(index, _)| *index);
        return chunks.into_iter().map(|(_, data)| data.to_owned()).collect();
    }

    [VIDEO_URL, IMAGE_URL]
        .iter()
        .find_map(|field| record.get_str(field).filter(|v| !v.is_empty()))
        .map(|value| vec![value.to_owned()])
        .unwrap_or_default()
}
