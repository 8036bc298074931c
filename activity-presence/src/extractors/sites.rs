//! Browser tab title extractors.
//!
//! Sites append their brand to the page title with a fixed separator
//! (`"Show - Netflix"`, `"owner/repo · GitHub"`). Each extractor strips that
//! suffix; when the suffix is missing the title is returned as-is.

use super::before_last;

const YOUTUBE_SUFFIX: &str = " - YouTube";
const SPOTIFY_SUFFIX: &str = " - Spotify";
const SOUNDCLOUD_SUFFIX: &str = " - SoundCloud";
const NETFLIX_SUFFIX: &str = " - Netflix";
const TWITCH_SUFFIX: &str = " - Twitch";
const GITHUB_SUFFIXES: [&str; 2] = [" · GitHub", " - GitHub"];
const REDDIT_MARKER: &str = " : r/";
const SITE_SEPARATORS: [&str; 3] = [" - ", " | ", " — "];

/// Site name used when a title carries no recognizable separator
pub const UNKNOWN_SITE: &str = "the web";

/// Whether the title is a video page rather than the YouTube front page
pub fn is_youtube_video(title: &str) -> bool {
    title.contains(YOUTUBE_SUFFIX)
}

/// `"Rick Astley - Never Gonna Give You Up - YouTube"` → `"Rick Astley - Never Gonna Give You Up"`
pub fn youtube_title(title: &str) -> String {
    strip_suffix(title, YOUTUBE_SUFFIX)
}

/// `"Song • Artist - Spotify"` → `"Song • Artist"`
pub fn spotify_track(title: &str) -> String {
    strip_suffix(title, SPOTIFY_SUFFIX)
}

/// `"Song by Artist - SoundCloud"` → `"Song by Artist"`
pub fn soundcloud_track(title: &str) -> String {
    strip_suffix(title, SOUNDCLOUD_SUFFIX)
}

pub fn netflix_show(title: &str) -> String {
    strip_suffix(title, NETFLIX_SUFFIX)
}

pub fn twitch_stream(title: &str) -> String {
    strip_suffix(title, TWITCH_SUFFIX)
}

/// Repository or page name; the middle-dot form is preferred over the dash form
pub fn github_repo(title: &str) -> String {
    GITHUB_SUFFIXES
        .iter()
        .find_map(|suffix| before_last(title, suffix))
        .unwrap_or(title)
        .to_string()
}

/// `"Cool post : r/programming"` → `"r/programming"`.
///
/// Everything after the marker is kept, so trailing text such as
/// `" - Reddit"` survives.
pub fn reddit_subreddit(title: &str) -> String {
    match title.find(REDDIT_MARKER) {
        // skip " : " and keep the "r/" prefix
        Some(index) if index > 0 => title[index + 3..].trim().to_string(),
        _ => title.to_string(),
    }
}

/// Trailing site name after the last separator, trying `" - "`, `" | "`,
/// `" — "` in that order
pub fn website_name(title: &str) -> String {
    for separator in SITE_SEPARATORS {
        if let Some(index) = title.rfind(separator) {
            let name = title[index + separator.len()..].trim();
            if index > 0 && !name.is_empty() {
                return name.to_string();
            }
        }
    }
    UNKNOWN_SITE.to_string()
}

fn strip_suffix(title: &str, suffix: &str) -> String {
    before_last(title, suffix).unwrap_or(title).to_string()
}
