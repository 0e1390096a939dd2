//! Property-based tests for BookmarkManager operations.
//!
//! Adding links without files never touches the model, always settles as
//! completed, yields unique ids, and keeps the collection most recent first.

use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use recall::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use recall::services::analysis_client::AnalysisClientTrait;
use recall::services::url_classifier;
use recall::types::ai::GenerateContentRequest;
use recall::types::bookmark::{AnalysisStatus, ConnectionInsight, MediaType};
use recall::types::errors::AnalysisError;

/// A model that must never be reached by the operations under test.
struct UnreachableModel;

#[async_trait]
impl AnalysisClientTrait for UnreachableModel {
    async fn generate_content(
        &self,
        _request: &GenerateContentRequest,
    ) -> Result<String, AnalysisError> {
        Err(AnalysisError::NetworkError("model must not be called".to_string()))
    }
}

/// Strategy for generating http(s) URLs across known platforms and generic sites.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        prop_oneof![
            Just("www.youtube.com".to_string()),
            Just("instagram.com".to_string()),
            Just("x.com".to_string()),
            Just("www.reddit.com".to_string()),
            "[a-z][a-z0-9]{2,12}\\.(org|net|io)",
        ],
        proptest::option::of("/[a-z0-9_-]{1,12}"),
    )
        .prop_map(|(scheme, host, path)| {
            format!("{}://{}{}", scheme, host, path.unwrap_or_default())
        })
}

fn arb_hint() -> impl Strategy<Value = MediaType> {
    prop_oneof![
        Just(MediaType::Image),
        Just(MediaType::Video),
        Just(MediaType::Text)
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_adds_are_ordered_unique_and_completed(
        entries in proptest::collection::vec((arb_url(), arb_hint()), 1..20)
    ) {
        let mgr = BookmarkManager::new(Arc::new(UnreachableModel));

        let ids: Vec<String> = entries
            .iter()
            .map(|(url, hint)| mgr.add_bookmark(url, None, *hint).id)
            .collect();

        let list = mgr.list_bookmarks();
        prop_assert_eq!(list.len(), entries.len());

        // Most recent first: the listing is the insertion order reversed.
        let listed: Vec<String> = list.iter().map(|b| b.id.clone()).collect();
        let mut expected = ids.clone();
        expected.reverse();
        prop_assert_eq!(listed, expected);

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), ids.len());

        for bm in list.iter() {
            prop_assert_eq!(bm.analysis_status, AnalysisStatus::Completed);
            prop_assert!(bm.tags.is_empty());
            prop_assert!(bm.media_data.is_none());
            prop_assert_eq!(bm.platform, url_classifier::classify_platform(&bm.url));
            prop_assert_eq!(bm.thumbnail_url.clone(), url_classifier::extract_thumbnail(&bm.url));
        }
        prop_assert_eq!(mgr.in_flight_count(), 0);
    }

    #[test]
    fn prop_media_type_follows_thumbnail_or_hint(url in arb_url(), hint in arb_hint()) {
        let mgr = BookmarkManager::new(Arc::new(UnreachableModel));
        let id = mgr.add_bookmark(&url, None, hint).id;
        let bm = mgr.get_bookmark(&id).unwrap();

        match bm.thumbnail_url {
            Some(_) if bm.platform.is_video_first() => prop_assert_eq!(bm.media_type, MediaType::Video),
            Some(_) => prop_assert_eq!(bm.media_type, MediaType::Image),
            None => prop_assert_eq!(bm.media_type, hint),
        }
    }

    #[test]
    fn prop_resolve_insight_skips_unknown_ids(
        urls in proptest::collection::vec(arb_url(), 1..8),
        ghosts in proptest::collection::vec("[a-z]{6}", 0..4),
    ) {
        let mgr = BookmarkManager::new(Arc::new(UnreachableModel));
        let ids: Vec<String> = urls
            .iter()
            .map(|url| mgr.add_bookmark(url, None, MediaType::Text).id)
            .collect();

        let mut related = ids.clone();
        related.extend(ghosts);
        let insight = ConnectionInsight {
            title: "t".to_string(),
            description: "d".to_string(),
            related_bookmark_ids: related,
        };

        let resolved: Vec<String> = mgr.resolve_insight(&insight).iter().map(|b| b.id.clone()).collect();
        prop_assert_eq!(resolved, ids);
    }
}
