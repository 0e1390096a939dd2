use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::bookmark::MediaType;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Where the bytes of a user-supplied file live.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A user-supplied image or video awaiting encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub source: MediaSource,
    pub mime_type: String,
}

impl MediaFile {
    /// A file on disk. Without a declared MIME type, one is guessed from the extension.
    pub fn from_path(path: impl Into<PathBuf>, mime_type: Option<&str>) -> Self {
        let path = path.into();
        let mime_type = match mime_type {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => guess_mime_type(&path),
        };
        Self {
            source: MediaSource::Path(path),
            mime_type,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, mime_type: &str) -> Self {
        Self {
            source: MediaSource::Bytes(bytes),
            mime_type: mime_type.to_string(),
        }
    }

    /// Media type hint derived from the declared content type.
    pub fn media_type(&self) -> MediaType {
        MediaType::from_mime(&self.mime_type)
    }
}

fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

/// Inline, transportable form of a media file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncodedMedia {
    /// Standard base64, no data-URI header.
    pub data: String,
    pub mime_type: String,
}

impl EncodedMedia {
    /// Browser-style `data:` URI, for previews.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}
