use common::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Malformed fragment '{id}': {reason}")]
    MalformedFragment { id: String, reason: String },

    #[error("Payload of {length} characters exceeds the {limit}-character fragment budget")]
    PayloadTooLarge { length: usize, limit: usize },

    #[error(
        "Integrity check failed for asset '{id}': expected {expected_length:?} characters \
         (sha256 {expected_sha256:?}), reassembled {actual_length}"
    )]
    IntegrityMismatch {
        id: String,
        expected_length: Option<u64>,
        expected_sha256: Option<String>,
        actual_length: usize,
    },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid chunking config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
