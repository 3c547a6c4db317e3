use std::fmt;

/// Errors that can occur during document store operations.
#[derive(Debug)]
pub enum StorageError {
    /// An I/O error occurred.
    Io(std::io::Error),
    /// A record or collection path failed validation.
    InvalidPath(String),
    /// The provided content hash is invalid.
    InvalidHash(String),
    /// The serialized record exceeds the store's per-record ceiling.
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// A record could not be encoded to or decoded from its stored form.
    Serialization(serde_json::Error),
    /// The backend rejected the operation for a reason of its own.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::InvalidPath(msg) => write!(f, "invalid record path: {msg}"),
            Self::InvalidHash(msg) => write!(f, "invalid content hash: {msg}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "record exceeds size limit ({actual} > {limit} bytes)")
            }
            Self::Serialization(err) => write!(f, "record serialization error: {err}"),
            Self::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
