use std::path::PathBuf;

use serde::Deserialize;

/// Per-record ceiling of the hosted document store, in bytes of serialized
/// record.
pub const DEFAULT_MAX_RECORD_SIZE: u64 = 1_000_000;

/// App-level document store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the filesystem store. Default: "./data".
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Largest serialized record the store accepts. Default: 1,000,000.
    #[serde(default = "default_max_record_size")]
    pub max_record_size: u64,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data")
}
fn default_max_record_size() -> u64 {
    DEFAULT_MAX_RECORD_SIZE
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_record_size: default_max_record_size(),
        }
    }
}
