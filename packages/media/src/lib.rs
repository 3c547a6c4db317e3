//! Chunked storage of base64 video and image payloads in a document store
//! with a per-record size ceiling.
//!
//! Payloads small enough are kept inline on the parent record; larger ones
//! are split into fixed-size fragments, each its own child record. Two older
//! inline layouts remain readable.

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fragments;
pub mod kind;
pub mod layout;
pub mod service;

pub use config::{ChunkingConfig, IntegrityMode, OverflowPolicy};
pub use decoder::{extract_legacy_fragments, reconstruct_base64};
pub use encoder::{EncodedAsset, Encoding, encode, split_fragments};
pub use error::{MediaError, Result};
pub use fragments::{DeleteSummary, FragmentStore};
pub use kind::AssetKind;
pub use layout::AssetLayout;
pub use service::{AssetService, AssetSummary, UploadReceipt};
