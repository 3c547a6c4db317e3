mod error;
mod hash;
mod path;
mod record;
mod traits;

pub mod filesystem;
pub mod memory;

pub use error::StorageError;
pub use hash::ContentHash;
pub use path::{CollectionPath, RecordPath, validate_segment};
pub use record::{Document, Record, compare_field};
pub use traits::DocumentStore;
