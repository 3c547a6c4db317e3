use std::fmt;

use super::error::StorageError;

/// Path of a single record: alternating collection / id segments, e.g.
/// `videos/abc` or `videos/abc/chunks/chunk0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordPath {
    segments: Vec<String>,
}

/// Path of a collection: a record path followed by a collection name, or a
/// top-level collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Validates one path segment.
///
/// Segments become directory and file names in the filesystem store, so the
/// rules follow the flat-filename rules: no separators, no traversal, no
/// control characters.
pub fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty() {
        return Err(StorageError::InvalidPath("empty path segment".into()));
    }
    if segment.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidPath(format!(
            "control characters are not allowed in {segment:?}"
        )));
    }
    if segment.contains('/') || segment.contains('\\') {
        return Err(StorageError::InvalidPath(format!(
            "path separators are not allowed in {segment:?}"
        )));
    }
    if segment == "." || segment == ".." {
        return Err(StorageError::InvalidPath(format!(
            "'{segment}' is not a valid segment"
        )));
    }
    if segment.starts_with('.') {
        return Err(StorageError::InvalidPath(format!(
            "hidden segments are not allowed: {segment:?}"
        )));
    }
    Ok(())
}

impl CollectionPath {
    /// A top-level collection such as `videos`.
    pub fn root(name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        validate_segment(&name)?;
        Ok(Self {
            segments: vec![name],
        })
    }

    /// Path of the record `id` inside this collection.
    pub fn record(&self, id: impl Into<String>) -> Result<RecordPath, StorageError> {
        let id = id.into();
        validate_segment(&id)?;
        let mut segments = self.segments.clone();
        segments.push(id);
        Ok(RecordPath { segments })
    }

    /// The collection's own name (last segment).
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl RecordPath {
    /// Shorthand for `CollectionPath::root(collection)?.record(id)`.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Result<Self, StorageError> {
        CollectionPath::root(collection)?.record(id)
    }

    /// A subcollection scoped under this record.
    pub fn collection(&self, name: impl Into<String>) -> Result<CollectionPath, StorageError> {
        let name = name.into();
        validate_segment(&name)?;
        let mut segments = self.segments.clone();
        segments.push(name);
        Ok(CollectionPath { segments })
    }

    /// The record id (last segment).
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The collection this record lives in.
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
