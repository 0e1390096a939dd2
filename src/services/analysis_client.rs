//! Analysis Client for Recall.
//!
//! Talks to a generative model to summarize a single piece of media and to find
//! thematic connections across bookmarks. Prompt construction and reply parsing
//! live in the provided trait methods, so every transport (the Gemini REST
//! client below, or a test double) shares the same request/response contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::services::media_encoder;
use crate::types::ai::*;
use crate::types::bookmark::Bookmark;
use crate::types::errors::AnalysisError;
use crate::types::media::{EncodedMedia, MediaFile};
use crate::types::settings::AISettings;

pub const SYSTEM_INSTRUCTION: &str = "You are the personal knowledge assistant inside \
Recall, a bookmarking app. You analyze content the user saved, summarize it concisely, \
and later surface unexpected connections between items that look unrelated. Stay brief \
and insightful, and focus on why the user might have saved each item.";

/// Summary returned for an empty collection, without calling the model.
pub const EMPTY_RECAP_SUMMARY: &str = "No bookmarks to analyze yet.";

const JSON_MIME_TYPE: &str = "application/json";

/// Contract with the generative model.
///
/// Implementors only supply `generate_content`, the raw request/response call.
#[async_trait]
pub trait AnalysisClientTrait: Send + Sync {
    /// Sends one request and returns the reply text. No retries.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, AnalysisError>;

    /// Asks for a title, a one-sentence summary, and 3-5 lowercase tags for the media.
    async fn analyze_media(
        &self,
        media: &EncodedMedia,
        url: &str,
        kind: MediaKind,
    ) -> Result<MediaAnalysis, AnalysisError> {
        let request = media_request(media, url, kind);
        let text = self.generate_content(&request).await?;
        parse_json_reply(&text)
    }

    /// Encodes `file` and analyzes it.
    async fn analyze_file(
        &self,
        file: &MediaFile,
        url: &str,
        kind: MediaKind,
    ) -> Result<MediaAnalysis, AnalysisError> {
        let media = media_encoder::encode_file(file).await?;
        self.analyze_media(&media, url, kind).await
    }

    /// Produces a short recap and up to three connections across `bookmarks`.
    ///
    /// An empty slice short-circuits without contacting the model.
    async fn find_connections(
        &self,
        bookmarks: &[Arc<Bookmark>],
    ) -> Result<ConnectionReport, AnalysisError> {
        if bookmarks.is_empty() {
            return Ok(ConnectionReport {
                summary: EMPTY_RECAP_SUMMARY.to_string(),
                insights: Vec::new(),
            });
        }
        let request = connections_request(bookmarks);
        let text = self.generate_content(&request).await?;
        parse_json_reply(&text)
    }
}

// ─── Prompts ───

fn request_with_parts(parts: Vec<Part>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part::text(SYSTEM_INSTRUCTION)],
        },
        generation_config: GenerationConfig {
            response_mime_type: JSON_MIME_TYPE.to_string(),
        },
    }
}

pub fn media_prompt(url: &str, kind: MediaKind) -> String {
    format!(
        "Analyze this {kind} saved from {url}.\n\
         1. Give it a short, catchy title.\n\
         2. Summarize its main idea or content in one sentence.\n\
         3. Generate 3-5 relevant descriptive tags, all lowercase.\n\n\
         Respond with JSON: {{ \"title\": string, \"summary\": string, \"tags\": string[] }}",
        kind = kind.as_str(),
        url = url,
    )
}

/// Builds the request for `analyze_media`: the inline media followed by the instruction.
pub fn media_request(media: &EncodedMedia, url: &str, kind: MediaKind) -> GenerateContentRequest {
    request_with_parts(vec![
        Part::inline(media.mime_type.clone(), media.data.clone()),
        Part::text(media_prompt(url, kind)),
    ])
}

/// One line per bookmark: id, platform, title and summary with placeholders for missing values.
pub fn serialize_bookmarks(bookmarks: &[Arc<Bookmark>]) -> String {
    bookmarks
        .iter()
        .map(|b| {
            format!(
                "ID: {} | Type: {} | Title: {} | Summary: {}",
                b.id,
                b.platform.as_str(),
                b.title.as_deref().unwrap_or("Untitled"),
                b.summary.as_deref().unwrap_or("No summary"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn connections_prompt(bookmarks: &[Arc<Bookmark>]) -> String {
    format!(
        "These are the bookmarks the user saved recently:\n\n{}\n\n\
         Task:\n\
         1. Write a friendly, upbeat recap in the style of a push notification (at most 2 sentences) \
         that makes the user feel good about what they learned.\n\
         2. Find up to 3 interesting connections or themes between these items, including subtle links \
         (for example a design tutorial and a coding tool that both relate to productivity).\n\n\
         Respond with JSON:\n\
         {{\n  \"summary\": \"...\",\n  \"insights\": [\n    \
         {{ \"title\": \"...\", \"description\": \"...\", \"relatedBookmarkIds\": [\"ID1\", \"ID2\"] }}\n  ]\n}}",
        serialize_bookmarks(bookmarks)
    )
}

pub fn connections_request(bookmarks: &[Arc<Bookmark>]) -> GenerateContentRequest {
    request_with_parts(vec![Part::text(connections_prompt(bookmarks))])
}

// ─── Reply parsing ───

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the model's reply text as JSON of shape `T`.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, AnalysisError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

// ─── Gemini transport ───

/// `AnalysisClientTrait` over the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: Client,
    api_endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: &AISettings) -> Result<Self, AnalysisError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        Ok(Self {
            http,
            api_endpoint: settings.api_endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_endpoint, self.model)
    }
}

#[async_trait]
impl AnalysisClientTrait for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        log::debug!("generateContent -> {}", self.model);
        let response = self
            .http
            .post(self.request_url())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::HttpStatus(status.as_u16(), body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        body.text().ok_or(AnalysisError::EmptyResponse)
    }
}
