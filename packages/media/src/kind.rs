use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::layout::{IMAGE_URL, VIDEO_URL};

/// The two asset types the store accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    #[default]
    Video,
    Image,
}

impl AssetKind {
    /// Parent-record field holding an inline payload of this kind.
    pub fn inline_field(self) -> &'static str {
        match self {
            Self::Video => VIDEO_URL,
            Self::Image => IMAGE_URL,
        }
    }

    /// Classify a MIME type such as `video/mp4` or `image/png`.
    pub fn from_mime(mime: &str) -> Result<Self, MediaError> {
        match mime.split('/').next() {
            Some("video") => Ok(Self::Video),
            Some("image") => Ok(Self::Image),
            _ => Err(MediaError::UnsupportedMediaType(mime.to_string())),
        }
    }

    /// Guess the kind from a file name's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MediaError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first().ok_or_else(|| {
            MediaError::UnsupportedMediaType(format!("unknown type for {}", path.display()))
        })?;
        Self::from_mime(mime.essence_str())
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Image => write!(f, "image"),
        }
    }
}

impl FromStr for AssetKind {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "image" => Ok(Self::Image),
            other => Err(MediaError::UnsupportedMediaType(other.to_string())),
        }
    }
}
