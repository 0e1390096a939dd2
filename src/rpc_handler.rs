//! RPC method handler for the Recall JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! bookmark store and URL classifier via the `App` struct.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::services::media_encoder;
use crate::services::url_classifier;
use crate::types::bookmark::{Bookmark, MediaType};
use crate::types::media::MediaFile;

fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn require_http_url(params: &Value) -> Result<&str, String> {
    let url = require_str(params, "url")?.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("invalid url: must start with http:// or https://".to_string());
    }
    Ok(url)
}

fn bookmark_to_json(bookmark: &Bookmark) -> Result<Value, String> {
    serde_json::to_value(bookmark).map_err(|e| e.to_string())
}

/// Parses the optional `file` param: `{"data_uri": "data:<mime>;base64,..."}`.
///
/// Filesystem paths are not accepted here; the caller sends the bytes it wants analyzed.
fn parse_file(params: &Value) -> Result<Option<MediaFile>, String> {
    let Some(file) = params.get("file").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    if file.get("path").is_some() {
        return Err("file paths are not accepted; send a data_uri".to_string());
    }

    let uri = file
        .get("data_uri")
        .and_then(|v| v.as_str())
        .ok_or("file requires a data_uri")?;
    media_encoder::decode_data_uri(uri)
        .map(Some)
        .map_err(|e| e.to_string())
}

fn parse_media_type(params: &Value) -> Result<Option<MediaType>, String> {
    match params.get("media_type") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|_| format!("invalid media_type: {}", v)),
    }
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    let bookmarks = &app.bookmark_manager;

    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.add" => {
            let url = require_http_url(params)?;
            let file = parse_file(params)?;
            let hint = match parse_media_type(params)? {
                Some(media_type) => media_type,
                None => file
                    .as_ref()
                    .map(MediaFile::media_type)
                    .unwrap_or(MediaType::Text),
            };

            let ticket = bookmarks.add_bookmark(url, file, hint);
            let added = bookmarks
                .get_bookmark(&ticket.id)
                .ok_or_else(|| format!("bookmark not found: {}", ticket.id))?;
            bookmark_to_json(&added)
        }
        "bookmark.list" => {
            let items = bookmarks.list_bookmarks();
            let arr = items
                .iter()
                .map(|b| bookmark_to_json(b))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!({"items": arr, "total": items.len(), "in_flight": bookmarks.in_flight_count()}))
        }
        "bookmark.get" => {
            let id = require_str(params, "id")?;
            let bookmark = bookmarks
                .get_bookmark(id)
                .ok_or_else(|| format!("bookmark not found: {}", id))?;
            bookmark_to_json(&bookmark)
        }

        // ─── Recap ───
        "recap.generate" => {
            let digest = bookmarks.generate_recap().await;
            let insights = digest
                .insights
                .iter()
                .map(|insight| {
                    let related = bookmarks
                        .resolve_insight(insight)
                        .iter()
                        .map(|b| json!({"id": b.id, "url": b.url, "title": b.title, "platform": b.platform}))
                        .collect::<Vec<_>>();
                    json!({
                        "title": insight.title,
                        "description": insight.description,
                        "relatedBookmarkIds": insight.related_bookmark_ids,
                        "related": related,
                    })
                })
                .collect::<Vec<_>>();
            Ok(json!({"date": digest.date, "summary": digest.summary, "insights": insights}))
        }

        // ─── Classification preview ───
        "platform.classify" => {
            let url = require_str(params, "url")?;
            let platform = url_classifier::classify_platform(url);
            Ok(json!({
                "platform": platform,
                "display_name": platform.display_name(),
                "thumbnail_url": url_classifier::extract_thumbnail(url),
                "title": url_classifier::heuristic_title(url, platform),
                "description": url_classifier::heuristic_description(url, platform),
            }))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
