pub mod config;
pub mod storage;

pub use config::StorageConfig;
pub use storage::{DocumentStore, Record, RecordPath, StorageError};
