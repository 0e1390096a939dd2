use std::fmt;

use super::bookmark::AnalysisStatus;

// === MediaError ===

/// Errors related to reading and encoding user-supplied media.
#[derive(Debug)]
pub enum MediaError {
    /// The file's contents could not be read.
    ReadFailed(String),
    /// A `data:` URI was missing its header, its payload, or was not base64.
    InvalidDataUri(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::ReadFailed(msg) => write!(f, "Failed to read media file: {}", msg),
            MediaError::InvalidDataUri(msg) => write!(f, "Invalid data URI: {}", msg),
        }
    }
}

impl std::error::Error for MediaError {}

// === AnalysisError ===

/// Errors related to calls against the generative model.
#[derive(Debug)]
pub enum AnalysisError {
    /// No API key is configured for the model endpoint.
    MissingApiKey,
    /// The request could not be sent or the connection failed.
    NetworkError(String),
    /// The service answered with a non-success HTTP status.
    HttpStatus(u16, String),
    /// The service answered without any text.
    EmptyResponse,
    /// The text was not JSON of the expected shape.
    MalformedResponse(String),
    /// The media to analyze could not be encoded.
    Media(MediaError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingApiKey => write!(f, "Analysis API key not configured"),
            AnalysisError::NetworkError(msg) => write!(f, "Analysis network error: {}", msg),
            AnalysisError::HttpStatus(status, body) => {
                write!(f, "Analysis service returned HTTP {}: {}", status, body)
            }
            AnalysisError::EmptyResponse => write!(f, "No response text from analysis service"),
            AnalysisError::MalformedResponse(msg) => {
                write!(f, "Malformed analysis response: {}", msg)
            }
            AnalysisError::Media(err) => write!(f, "Analysis media error: {}", err),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MediaError> for AnalysisError {
    fn from(err: MediaError) -> Self {
        AnalysisError::Media(err)
    }
}

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// Bookmark with the given ID was not found.
    NotFound(String),
    /// The analysis status cannot move between the given states.
    InvalidTransition {
        id: String,
        from: AnalysisStatus,
        to: AnalysisStatus,
    },
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::InvalidTransition { id, from, to } => write!(
                f,
                "Invalid status transition for bookmark {}: {} -> {}",
                id, from, to
            ),
        }
    }
}

impl std::error::Error for BookmarkError {}

// === SettingsError ===

/// Errors related to settings operations.
#[derive(Debug)]
pub enum SettingsError {
    /// File I/O error.
    IoError(String),
    /// JSON serialization/deserialization error.
    SerializationError(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
