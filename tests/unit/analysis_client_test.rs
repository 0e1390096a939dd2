//! Unit tests for the analysis client contract: request building, prompt
//! serialization, reply parsing, and the empty-collection short-circuit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recall::services::analysis_client::{
    connections_request, media_request, parse_json_reply, serialize_bookmarks,
    AnalysisClientTrait, GeminiClient, EMPTY_RECAP_SUMMARY, SYSTEM_INSTRUCTION,
};
use recall::types::ai::{
    ConnectionReport, GenerateContentRequest, GenerateContentResponse, MediaAnalysis, MediaKind,
};
use recall::types::bookmark::{AnalysisStatus, Bookmark, MediaType, Platform};
use recall::types::errors::AnalysisError;
use recall::types::media::{EncodedMedia, MediaFile};
use recall::types::settings::AISettings;
use serde_json::json;

/// Returns a fixed reply and records every request it receives.
struct ScriptedModel {
    reply: Result<String, ()>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerateContentRequest>>,
}

impl ScriptedModel {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AnalysisClientTrait for ScriptedModel {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.reply
            .clone()
            .map_err(|_| AnalysisError::NetworkError("connection refused".to_string()))
    }
}

fn bookmark(id: &str, title: Option<&str>, summary: Option<&str>) -> Arc<Bookmark> {
    Arc::new(Bookmark {
        id: id.to_string(),
        url: format!("https://example.com/{}", id),
        platform: Platform::Web,
        media_type: MediaType::Text,
        title: title.map(str::to_string),
        summary: summary.map(str::to_string),
        tags: vec![],
        created_at: 0,
        media_data: None,
        thumbnail_url: None,
        analysis_status: AnalysisStatus::Completed,
    })
}

fn png() -> EncodedMedia {
    EncodedMedia {
        data: "aGVsbG8=".to_string(),
        mime_type: "image/png".to_string(),
    }
}

// ─── Request building ───

#[test]
fn test_media_request_shape() {
    let request = media_request(&png(), "https://x.com/a", MediaKind::Image);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(value["contents"][0]["parts"][0]["inlineData"]["data"], "aGVsbG8=");
    let prompt = value["contents"][0]["parts"][1]["text"].as_str().unwrap();
    assert!(prompt.contains("image"));
    assert!(prompt.contains("https://x.com/a"));
    assert!(prompt.contains("lowercase"));
    assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(value["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
}

#[test]
fn test_serialize_bookmarks_lines() {
    let lines = serialize_bookmarks(&[
        bookmark("a", Some("Rust book"), Some("Learning Rust")),
        bookmark("b", None, None),
    ]);
    assert_eq!(
        lines,
        "ID: a | Type: web | Title: Rust book | Summary: Learning Rust\n\
         ID: b | Type: web | Title: Untitled | Summary: No summary"
    );
}

#[test]
fn test_connections_request_is_text_only() {
    let request = connections_request(&[bookmark("a", None, None)]);
    let parts = &request.contents[0].parts;
    assert_eq!(parts.len(), 1);
    assert!(parts[0].inline_data.is_none());
    assert!(parts[0].text.as_deref().unwrap().contains("ID: a | Type: web"));
}

// ─── Reply parsing ───

#[test]
fn test_parse_media_analysis() {
    let parsed: MediaAnalysis =
        parse_json_reply(r#"{"title":"Desk","summary":"A desk.","tags":["design","workspace"]}"#)
            .unwrap();
    assert_eq!(parsed.title, "Desk");
    assert_eq!(parsed.tags, vec!["design", "workspace"]);
}

#[test]
fn test_parse_rejects_empty_and_malformed() {
    assert!(matches!(
        parse_json_reply::<MediaAnalysis>("   "),
        Err(AnalysisError::EmptyResponse)
    ));
    assert!(matches!(
        parse_json_reply::<MediaAnalysis>("not json"),
        Err(AnalysisError::MalformedResponse(_))
    ));
    assert!(matches!(
        parse_json_reply::<MediaAnalysis>(r#"{"title":"only a title"}"#),
        Err(AnalysisError::MalformedResponse(_))
    ));
}

#[test]
fn test_response_text_concatenates_parts() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"totalTokenCount": 10}
    }))
    .unwrap();
    assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));

    let empty: GenerateContentResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
    assert_eq!(empty.text(), None);
}

// ─── Trait operations ───

#[tokio::test]
async fn test_find_connections_empty_skips_model() {
    let model = ScriptedModel::replying("{}");
    let report = model.find_connections(&[]).await.unwrap();

    assert_eq!(report.summary, EMPTY_RECAP_SUMMARY);
    assert!(report.insights.is_empty());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_find_connections_parses_insights() {
    let model = ScriptedModel::replying(
        r#"{"summary":"Great day!","insights":[{"title":"Focus","description":"Both about focus.","relatedBookmarkIds":["a","ghost"]}]}"#,
    );
    let report: ConnectionReport = model
        .find_connections(&[bookmark("a", Some("A"), None)])
        .await
        .unwrap();

    assert_eq!(report.summary, "Great day!");
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].related_bookmark_ids, vec!["a", "ghost"]);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_analyze_media_propagates_failure() {
    let model = ScriptedModel::failing();
    let err = model
        .analyze_media(&png(), "https://example.com", MediaKind::Video)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::NetworkError(_)));
}

#[tokio::test]
async fn test_analyze_file_encodes_before_sending() {
    let model = ScriptedModel::replying(r#"{"title":"T","summary":"S","tags":["x"]}"#);
    let file = MediaFile::from_bytes(b"hello".to_vec(), "image/png");

    let analysis = model
        .analyze_file(&file, "https://example.com", MediaKind::Image)
        .await
        .unwrap();
    assert_eq!(analysis.title, "T");

    let request = model.last_request.lock().unwrap().clone().unwrap();
    let inline = request.contents[0].parts[0].inline_data.as_ref().unwrap();
    assert_eq!(inline.data, "aGVsbG8=");
}

#[tokio::test]
async fn test_gemini_without_key_fails_fast() {
    let client = GeminiClient::new(&AISettings::default()).unwrap();
    let err = client
        .analyze_media(&png(), "https://example.com", MediaKind::Image)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MissingApiKey));
}
