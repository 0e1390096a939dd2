//! Media Encoder for Recall.
//!
//! Turns a user-supplied file into standard base64 suitable for inline preview
//! and for submission to the analysis service.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::types::errors::MediaError;
use crate::types::media::{EncodedMedia, MediaFile, MediaSource};

/// Reads the whole file and encodes it. Produces exactly one result per call.
pub async fn encode_file(file: &MediaFile) -> Result<EncodedMedia, MediaError> {
    let data = match &file.source {
        MediaSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| MediaError::ReadFailed(format!("{}: {}", path.display(), e)))?;
            BASE64.encode(bytes)
        }
        MediaSource::Bytes(bytes) => BASE64.encode(bytes),
    };

    Ok(EncodedMedia {
        data,
        mime_type: file.mime_type.clone(),
    })
}

/// Splits a `data:` URI into its header and the payload after the first comma.
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    rest.split_once(',')
}

/// Decodes a base64 `data:` URI (as produced by a browser file reader) into a `MediaFile`.
pub fn decode_data_uri(uri: &str) -> Result<MediaFile, MediaError> {
    let (header, payload) = split_data_uri(uri.trim())
        .ok_or_else(|| MediaError::InvalidDataUri("missing data: header or comma".to_string()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default();
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(MediaError::InvalidDataUri(
            "only base64 payloads are supported".to_string(),
        ));
    }

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| MediaError::InvalidDataUri(format!("base64 decode error: {}", e)))?;

    let mime_type = if mime_type.is_empty() {
        "application/octet-stream"
    } else {
        mime_type
    };
    Ok(MediaFile::from_bytes(bytes, mime_type))
}
