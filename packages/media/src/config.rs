use serde::{Deserialize, Serialize};

use crate::error::{MediaError, Result};

/// What to do with a payload that needs more than `max_fragments` fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the first `max_fragments` fragments, drop the rest, log a warning.
    #[default]
    Truncate,
    /// Refuse the payload with [`MediaError::PayloadTooLarge`].
    Reject,
}

/// How reads treat a payload whose stored length or digest does not match
/// what was reassembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityMode {
    /// Skip verification.
    Off,
    /// Log the mismatch and return the payload anyway.
    #[default]
    Warn,
    /// Fail the read with [`MediaError::IntegrityMismatch`].
    Enforce,
}

/// Chunking configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Largest fragment, in characters. Default: 900,000.
    #[serde(default = "default_fragment_size")]
    pub fragment_size: usize,
    /// Most fragments stored per asset. Default: 50.
    #[serde(default = "default_max_fragments")]
    pub max_fragments: usize,
    /// Single-fragment payloads shorter than this are stored inline.
    /// Default: 500,000.
    #[serde(default = "default_inline_threshold")]
    pub inline_threshold: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(default)]
    pub integrity: IntegrityMode,
    /// Collection holding parent records. Default: "videos".
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Subcollection holding fragments under each parent. Default: "chunks".
    #[serde(default = "default_fragment_collection")]
    pub fragment_collection: String,
}

fn default_fragment_size() -> usize {
    900_000
}
fn default_max_fragments() -> usize {
    50
}
fn default_inline_threshold() -> usize {
    500_000
}
fn default_collection() -> String {
    "videos".into()
}
fn default_fragment_collection() -> String {
    "chunks".into()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            fragment_size: default_fragment_size(),
            max_fragments: default_max_fragments(),
            inline_threshold: default_inline_threshold(),
            overflow: OverflowPolicy::default(),
            integrity: IntegrityMode::default(),
            collection: default_collection(),
            fragment_collection: default_fragment_collection(),
        }
    }
}

impl ChunkingConfig {
    /// Longest payload, in characters, that is stored without loss.
    pub fn max_payload_len(&self) -> usize {
        self.fragment_size.saturating_mul(self.max_fragments)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fragment_size == 0 {
            return Err(MediaError::InvalidConfig(
                "fragment_size must be greater than zero".into(),
            ));
        }
        if self.max_fragments == 0 {
            return Err(MediaError::InvalidConfig(
                "max_fragments must be greater than zero".into(),
            ));
        }
        if self.inline_threshold > self.fragment_size {
            return Err(MediaError::InvalidConfig(format!(
                "inline_threshold ({}) cannot exceed fragment_size ({})",
                self.inline_threshold, self.fragment_size
            )));
        }
        common::storage::validate_segment(&self.collection)?;
        common::storage::validate_segment(&self.fragment_collection)?;
        Ok(())
    }
}
