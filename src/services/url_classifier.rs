//! URL Classifier for Recall.
//!
//! Pure, total functions that turn a raw URL into a platform tag, an optional
//! thumbnail, and placeholder title/description text. No network access; a URL
//! that fails to parse falls back to a generic value instead of erroring.

use url::Url;

use crate::types::bookmark::Platform;

const YOUTUBE_THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// Hostname fragments per platform, in match priority order.
const PLATFORM_HOSTS: &[(Platform, &[&str])] = &[
    (Platform::Twitter, &["twitter.com", "x.com"]),
    (Platform::Instagram, &["instagram.com"]),
    (Platform::TikTok, &["tiktok.com"]),
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::Facebook, &["facebook.com", "fb.com"]),
    (Platform::LinkedIn, &["linkedin.com"]),
    (Platform::Reddit, &["reddit.com"]),
];

fn hostname(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_lowercase()
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').filter(|s| !s.is_empty()).collect()
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn bare_domain(url: &Url) -> String {
    hostname(url).replacen("www.", "", 1)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Detects the platform from the URL's hostname. Unparsable or unknown URLs are `Web`.
pub fn classify_platform(url: &str) -> Platform {
    let Ok(parsed) = Url::parse(url) else {
        return Platform::Web;
    };
    let host = hostname(&parsed);

    PLATFORM_HOSTS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| host.contains(f)))
        .map(|(platform, _)| *platform)
        .unwrap_or(Platform::Web)
}

/// Returns a maximum-resolution thumbnail URL for YouTube links, `None` otherwise.
pub fn extract_thumbnail(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = hostname(&parsed);
    if !host.contains("youtube.com") && !host.contains("youtu.be") {
        return None;
    }

    let path = parsed.path();
    let short_link = host
        .contains("youtu.be")
        .then(|| path.trim_start_matches('/').to_string());
    let candidates = [
        short_link,
        query_param(&parsed, "v"),
        path.split("/embed/").nth(1).map(str::to_string),
        path.split("/v/").nth(1).map(str::to_string),
    ];

    let video_id = candidates.into_iter().flatten().find(|id| !id.is_empty())?;
    Some(format!("{}/{}/maxresdefault.jpg", YOUTUBE_THUMBNAIL_BASE, video_id))
}

/// Builds a readable placeholder title from the URL's path. Unparsable URLs are returned as-is.
pub fn heuristic_title(url: &str, platform: Platform) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let segments = path_segments(&parsed);
    let first = segments.first().copied();

    match platform {
        Platform::Instagram => match first {
            Some("p") => "Instagram Post".to_string(),
            Some("reel") => "Instagram Reel".to_string(),
            Some(handle) => format!("Instagram - {}", capitalize(handle)),
            None => "Instagram Link".to_string(),
        },
        Platform::Twitter => match first {
            Some(handle) => format!("X - {}", capitalize(handle)),
            None => "X / Twitter Link".to_string(),
        },
        Platform::YouTube => {
            if query_param(&parsed, "v").is_some() {
                return "YouTube Video".to_string();
            }
            match first {
                Some("shorts") => "YouTube Short".to_string(),
                Some(channel) if !matches!(channel, "watch" | "embed" | "v") => {
                    format!("YouTube - {}", capitalize(channel))
                }
                _ => "YouTube Video".to_string(),
            }
        }
        Platform::TikTok => match first.and_then(|s| s.strip_prefix('@')) {
            Some(handle) => format!("TikTok - {}", capitalize(handle)),
            None => "TikTok Video".to_string(),
        },
        Platform::LinkedIn => match (first, segments.get(1)) {
            (Some("in"), Some(name)) => format!("LinkedIn - {}", capitalize(name)),
            _ => "LinkedIn Post".to_string(),
        },
        Platform::Reddit => match (first, segments.get(1)) {
            (Some("r"), Some(name)) => format!("Reddit - r/{}", capitalize(name)),
            _ => "Reddit Post".to_string(),
        },
        Platform::Facebook => "Facebook Post".to_string(),
        Platform::Web => {
            let domain = bare_domain(&parsed);
            match segments.last() {
                Some(last) => {
                    let words = last.replace(['-', '_'], " ");
                    format!("{} - {}", domain, capitalize(&words))
                }
                None => domain,
            }
        }
    }
}

/// Static one-line description per platform. Unparsable URLs get a generic prompt.
pub fn heuristic_description(url: &str, platform: Platform) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "Click to view content".to_string();
    };

    match platform {
        Platform::Instagram => "View this post on Instagram".to_string(),
        Platform::Twitter => "View this post on X / Twitter".to_string(),
        Platform::YouTube => "Watch this video on YouTube".to_string(),
        Platform::TikTok => "Watch this video on TikTok".to_string(),
        Platform::LinkedIn => "View this post on LinkedIn".to_string(),
        Platform::Reddit => "View this discussion on Reddit".to_string(),
        Platform::Facebook => "View this post on Facebook".to_string(),
        Platform::Web => format!("Visit {} to view this content", bare_domain(&parsed)),
    }
}
