//! Layout selection and fragment splitting for base64 payloads.

use tracing::warn;

use crate::config::{ChunkingConfig, OverflowPolicy};
use crate::error::{MediaError, Result};

/// How an encoded payload is to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedAsset {
    /// Whole payload in one field of the parent record.
    Inline(String),
    /// Ordered fragments, one child record each.
    Subcollection { fragments: Vec<String> },
}

impl EncodedAsset {
    pub fn uses_subcollection(&self) -> bool {
        matches!(self, Self::Subcollection { .. })
    }

    /// Number of child records this layout writes (zero for inline).
    pub fn fragment_count(&self) -> usize {
        match self {
            Self::Inline(_) => 0,
            Self::Subcollection { fragments } => fragments.len(),
        }
    }

    /// Length in characters of the payload as it will be stored.
    pub fn stored_len(&self) -> usize {
        match self {
            Self::Inline(value) => value.chars().count(),
            Self::Subcollection { fragments } => {
                fragments.iter().map(|f| f.chars().count()).sum()
            }
        }
    }
}

/// Result of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub asset: EncodedAsset,
    /// Characters dropped past the fragment budget. Non-zero only under
    /// [`OverflowPolicy::Truncate`].
    pub truncated_chars: usize,
}

/// Split `payload` into at most `max_fragments` slices of at most
/// `fragment_size` characters each.
///
/// Returns the fragments and the number of characters left over. Slices are
/// cut by character offset, never inside a UTF-8 sequence.
pub fn split_fragments(
    payload: &str,
    fragment_size: usize,
    max_fragments: usize,
) -> (Vec<String>, usize) {
    let mut fragments = Vec::new();
    let mut rest = payload;

    while !rest.is_empty() && fragments.len() < max_fragments {
        let cut = if rest.is_ascii() {
            fragment_size.min(rest.len())
        } else {
            rest.char_indices()
                .nth(fragment_size)
                .map(|(offset, _)| offset)
                .unwrap_or(rest.len())
        };
        let (head, tail) = rest.split_at(cut);
        fragments.push(head.to_owned());
        rest = tail;
    }

    (fragments, rest.chars().count())
}

/// Decide the storage layout for a base64 payload and produce its fragments.
///
/// A payload that fits in one fragment shorter than `inline_threshold` is
/// stored inline; everything else goes to the subcollection. The empty payload
/// is stored inline as the empty string.
pub fn encode(payload: &str, config: &ChunkingConfig) -> Result<Encoding> {
    if config.overflow == OverflowPolicy::Reject {
        let length = payload.chars().count();
        let limit = config.max_payload_len();
        if length > limit {
            return Err(MediaError::PayloadTooLarge { length, limit });
        }
    }

    let (mut fragments, truncated_chars) =
        split_fragments(payload, config.fragment_size, config.max_fragments);

    if truncated_chars > 0 {
        warn!(
            truncated_chars,
            max_fragments = config.max_fragments,
            fragment_size = config.fragment_size,
            "Payload exceeds fragment budget, trailing data dropped"
        );
    }

    let asset = match fragments.len() {
        0 => EncodedAsset::Inline(String::new()),
        1 if fragments[0].chars().count() < config.inline_threshold => {
            EncodedAsset::Inline(fragments.remove(0))
        }
        _ => EncodedAsset::Subcollection { fragments },
    };

    Ok(Encoding {
        asset,
        truncated_chars,
    })
}
