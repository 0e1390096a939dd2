use std::fmt;

use serde::{Deserialize, Serialize};

/// Content source a bookmarked URL belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    TikTok,
    Web,
    YouTube,
    Facebook,
    LinkedIn,
    Reddit,
}

impl Platform {
    /// Wire identifier, as used in prompts and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::Web => "web",
            Platform::YouTube => "youtube",
            Platform::Facebook => "facebook",
            Platform::LinkedIn => "linkedin",
            Platform::Reddit => "reddit",
        }
    }

    /// User-facing label for the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Web => "Web Article",
            Platform::Twitter => "X / Twitter",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
            Platform::Reddit => "Reddit",
        }
    }

    /// Platforms whose thumbnails stand for a video rather than a still image.
    pub fn is_video_first(&self) -> bool {
        match self {
            Platform::YouTube | Platform::TikTok => true,
            Platform::Twitter
            | Platform::Instagram
            | Platform::Web
            | Platform::Facebook
            | Platform::LinkedIn
            | Platform::Reddit => false,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of media a bookmark carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Text,
}

impl MediaType {
    /// Derives the media type from a declared MIME type (`video/*`, `image/*`, anything else is text).
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.trim().to_ascii_lowercase();
        if mime.starts_with("video/") {
            MediaType::Video
        } else if mime.starts_with("image/") {
            MediaType::Image
        } else {
            MediaType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Text => "text",
        }
    }
}

/// Lifecycle of the AI analysis attached to a bookmark.
///
/// `Pending` is the only initial state; `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: AnalysisStatus) -> bool {
        match (self, next) {
            (AnalysisStatus::Pending, AnalysisStatus::Analyzing) => true,
            (AnalysisStatus::Pending, AnalysisStatus::Completed) => true,
            (AnalysisStatus::Analyzing, AnalysisStatus::Completed) => true,
            (AnalysisStatus::Analyzing, AnalysisStatus::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a saved bookmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub platform: Platform,
    pub media_type: MediaType,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
    /// Base64 payload of the user-supplied file, without a data-URI header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub analysis_status: AnalysisStatus,
}

/// A thematic connection discovered between bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInsight {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub related_bookmark_ids: Vec<String>,
}

/// On-demand recap across all bookmarks. Produced fresh for every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyDigest {
    /// Local calendar date (`YYYY-MM-DD`) the recap was produced.
    pub date: String,
    pub summary: String,
    pub insights: Vec<ConnectionInsight>,
}
