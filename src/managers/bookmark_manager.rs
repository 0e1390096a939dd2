//! Bookmark Manager for Recall.
//!
//! Owns the ordered, in-memory bookmark collection (most recent first) and
//! drives each bookmark through its analysis lifecycle:
//!
//! ```text
//! pending ──► analyzing ──► completed
//!    │                 └──► failed
//!    └──────────────────► completed   (no file supplied)
//! ```
//!
//! The collection is copy-on-write: every mutation builds a new `Vec` of shared
//! record pointers and swaps the outer `Arc`, so a snapshot handed to a reader
//! never changes underneath it. Only the record being changed is copied; the
//! rest (and their media payloads) are shared between snapshots.

use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::services::analysis_client::AnalysisClientTrait;
use crate::services::media_encoder;
use crate::services::url_classifier;
use crate::types::ai::MediaKind;
use crate::types::bookmark::{
    AnalysisStatus, Bookmark, ConnectionInsight, DailyDigest, MediaType, Platform,
};
use crate::types::errors::{AnalysisError, BookmarkError};
use crate::types::media::MediaFile;

/// Summary shown when the recap could not be generated.
pub const RECAP_FALLBACK_SUMMARY: &str = "Could not generate recap at this time.";

/// Trait defining bookmark store operations.
pub trait BookmarkManagerTrait {
    /// Inserts a bookmark and, if a file is supplied, starts its analysis in the background.
    fn add_bookmark(
        &self,
        url: &str,
        file: Option<MediaFile>,
        media_type_hint: MediaType,
    ) -> BookmarkTicket;
    /// Current snapshot, most recent first.
    fn list_bookmarks(&self) -> Arc<Vec<Arc<Bookmark>>>;
    fn get_bookmark(&self, id: &str) -> Option<Arc<Bookmark>>;
    /// Bookmarks referenced by the insight, in insight order. Unknown ids are skipped.
    fn resolve_insight(&self, insight: &ConnectionInsight) -> Vec<Arc<Bookmark>>;
    /// Number of bookmarks still pending or analyzing.
    fn in_flight_count(&self) -> usize;
}

/// Handle returned by `add_bookmark`.
///
/// Dropping it does not cancel the analysis.
#[derive(Debug)]
pub struct BookmarkTicket {
    pub id: String,
    analysis: Option<JoinHandle<()>>,
}

impl BookmarkTicket {
    /// Whether a background analysis was started for this bookmark.
    pub fn has_analysis(&self) -> bool {
        self.analysis.is_some()
    }

    /// Waits until the bookmark reaches a terminal status.
    pub async fn settled(self) -> String {
        if let Some(handle) = self.analysis {
            if let Err(e) = handle.await {
                log::error!("Analysis task for bookmark {} ended abnormally: {}", self.id, e);
            }
        }
        self.id
    }
}

/// In-memory bookmark store. Cheap to clone; clones share the same collection.
#[derive(Clone)]
pub struct BookmarkManager {
    bookmarks: Arc<RwLock<Arc<Vec<Arc<Bookmark>>>>>,
    client: Arc<dyn AnalysisClientTrait>,
}

impl BookmarkManager {
    pub fn new(client: Arc<dyn AnalysisClientTrait>) -> Self {
        Self::with_bookmarks(client, Vec::new())
    }

    /// Creates a store pre-populated with `bookmarks`, kept in the given order.
    pub fn with_bookmarks(client: Arc<dyn AnalysisClientTrait>, bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks: Arc::new(RwLock::new(Arc::new(
                bookmarks.into_iter().map(Arc::new).collect(),
            ))),
            client,
        }
    }

    /// Returns the current time as Unix milliseconds.
    fn now() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn snapshot(&self) -> Arc<Vec<Arc<Bookmark>>> {
        let guard = self.bookmarks.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn insert_front(&self, bookmark: Bookmark) {
        let mut guard = self.bookmarks.write().unwrap_or_else(|e| e.into_inner());
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.push(Arc::new(bookmark));
        next.extend(guard.iter().cloned());
        *guard = Arc::new(next);
    }

    /// Replaces the record `id` with a modified copy. Other records keep their position
    /// and stay shared with earlier snapshots.
    fn update_record<F>(&self, id: &str, apply: F) -> Result<(), BookmarkError>
    where
        F: FnOnce(&mut Bookmark) -> Result<(), BookmarkError>,
    {
        let mut guard = self.bookmarks.write().unwrap_or_else(|e| e.into_inner());
        let index = guard
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;

        let mut record = Bookmark::clone(&guard[index]);
        apply(&mut record)?;

        let mut next: Vec<Arc<Bookmark>> = guard.iter().cloned().collect();
        next[index] = Arc::new(record);
        *guard = Arc::new(next);
        Ok(())
    }

    /// Moves `id` to `to`, applying `merge` in the same replacement.
    fn transition<F>(&self, id: &str, to: AnalysisStatus, merge: F) -> Result<(), BookmarkError>
    where
        F: FnOnce(&mut Bookmark),
    {
        self.update_record(id, |record| {
            let from = record.analysis_status;
            if !from.can_transition_to(to) {
                return Err(BookmarkError::InvalidTransition {
                    id: record.id.clone(),
                    from,
                    to,
                });
            }
            merge(record);
            record.analysis_status = to;
            Ok(())
        })
    }

    fn log_store_error(result: Result<(), BookmarkError>) {
        if let Err(e) = result {
            log::error!("{}", e);
        }
    }

    /// Final media type: a URL thumbnail without a file overrides the caller's hint.
    pub fn resolve_media_type(
        platform: Platform,
        has_file: bool,
        has_thumbnail: bool,
        hint: MediaType,
    ) -> MediaType {
        if !has_file && has_thumbnail {
            if platform.is_video_first() {
                MediaType::Video
            } else {
                MediaType::Image
            }
        } else {
            hint
        }
    }

    /// Background tail of `add_bookmark` for bookmarks with a file.
    async fn run_analysis(self, id: String, url: String, file: MediaFile, kind: MediaKind) {
        let encoded = media_encoder::encode_file(&file).await;
        match &encoded {
            Ok(media) => {
                let data = media.data.clone();
                let stored = self.update_record(&id, |record| {
                    if record.media_data.is_none() {
                        record.media_data = Some(data);
                    }
                    Ok(())
                });
                Self::log_store_error(stored);
            }
            Err(e) => log::warn!("Failed to read file for bookmark {}: {}", id, e),
        }

        Self::log_store_error(self.transition(&id, AnalysisStatus::Analyzing, |_| {}));

        let outcome = match encoded {
            Ok(media) => self.client.analyze_media(&media, &url, kind).await,
            Err(e) => Err(AnalysisError::from(e)),
        };

        let result = match outcome {
            Ok(analysis) => {
                log::info!("Analysis completed for bookmark {}", id);
                self.transition(&id, AnalysisStatus::Completed, |record| {
                    record.title = Some(analysis.title);
                    record.summary = Some(analysis.summary);
                    record.tags = analysis.tags;
                })
            }
            Err(e) => {
                log::error!("Analysis failed for bookmark {}: {}", id, e);
                self.transition(&id, AnalysisStatus::Failed, |_| {})
            }
        };
        Self::log_store_error(result);
    }

    /// Builds a recap over the current collection. Never fails; see `generate_recap_for`.
    pub async fn generate_recap(&self) -> DailyDigest {
        let snapshot = self.snapshot();
        self.generate_recap_for(&snapshot).await
    }

    /// Builds a recap over `bookmarks`. A failed model call yields the fallback summary
    /// and no insights.
    pub async fn generate_recap_for(&self, bookmarks: &[Arc<Bookmark>]) -> DailyDigest {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        match self.client.find_connections(bookmarks).await {
            Ok(report) => DailyDigest {
                date,
                summary: report.summary,
                insights: report.insights,
            },
            Err(e) => {
                log::error!("Recap generation failed: {}", e);
                DailyDigest {
                    date,
                    summary: RECAP_FALLBACK_SUMMARY.to_string(),
                    insights: Vec::new(),
                }
            }
        }
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    /// Must run inside a Tokio runtime when `file` is `Some`.
    fn add_bookmark(
        &self,
        url: &str,
        file: Option<MediaFile>,
        media_type_hint: MediaType,
    ) -> BookmarkTicket {
        let platform = url_classifier::classify_platform(url);
        let thumbnail_url = url_classifier::extract_thumbnail(url);
        let media_type = Self::resolve_media_type(
            platform,
            file.is_some(),
            thumbnail_url.is_some(),
            media_type_hint,
        );

        let id = Uuid::new_v4().to_string();
        self.insert_front(Bookmark {
            id: id.clone(),
            url: url.to_string(),
            platform,
            media_type,
            title: Some(url_classifier::heuristic_title(url, platform)),
            summary: Some(url_classifier::heuristic_description(url, platform)),
            tags: Vec::new(),
            created_at: Self::now(),
            media_data: None,
            thumbnail_url,
            analysis_status: AnalysisStatus::Pending,
        });
        log::info!("Added bookmark {} ({}) for {}", id, platform, url);

        let analysis = match file {
            Some(file) => {
                let task = self
                    .clone()
                    .run_analysis(id.clone(), url.to_string(), file, MediaKind::from(media_type));
                Some(tokio::spawn(task))
            }
            None => {
                Self::log_store_error(self.transition(&id, AnalysisStatus::Completed, |_| {}));
                None
            }
        };

        BookmarkTicket { id, analysis }
    }

    fn list_bookmarks(&self) -> Arc<Vec<Arc<Bookmark>>> {
        self.snapshot()
    }

    fn get_bookmark(&self, id: &str) -> Option<Arc<Bookmark>> {
        self.snapshot().iter().find(|b| b.id == id).cloned()
    }

    fn resolve_insight(&self, insight: &ConnectionInsight) -> Vec<Arc<Bookmark>> {
        let snapshot = self.snapshot();
        insight
            .related_bookmark_ids
            .iter()
            .filter_map(|id| snapshot.iter().find(|b| &b.id == id).cloned())
            .collect()
    }

    fn in_flight_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|b| !b.analysis_status.is_terminal())
            .count()
    }
}
