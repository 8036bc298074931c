//! Activity classification.
//!
//! Turns a raw `(process name, window title)` observation into a
//! [`PresenceRecord`]. Dispatch is two-level and table driven:
//!
//! 1. The process name selects an [`AppFamily`] (first matching rule wins).
//! 2. Inside a browser, the window title selects a [`Site`] (again first match
//!    wins, so more specific sites are listed before generic ones).
//!
//! Classification never fails: unknown processes fall through to the generic
//! application record and an empty observation becomes "On Desktop".

use crate::extractors::{self, capitalize_first, editor, sites, DETAIL_BUDGET};
use crate::types::{IconRequest, IconRequestKind, PresenceRecord, RawActivity};
use chrono::{DateTime, Utc};
use tracing::trace;

/// Coarse application category chosen from the process name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppFamily {
    Browser,
    MediaPlayer,
    CodeEditor,
    ChatClient,
    TextEditor,
    FileBrowser,
    Generic,
}

impl AppFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppFamily::Browser => "browser",
            AppFamily::MediaPlayer => "media_player",
            AppFamily::CodeEditor => "code_editor",
            AppFamily::ChatClient => "chat_client",
            AppFamily::TextEditor => "text_editor",
            AppFamily::FileBrowser => "file_browser",
            AppFamily::Generic => "generic",
        }
    }
}

/// Process-name substrings per family, in priority order
const FAMILY_RULES: &[(AppFamily, &[&str])] = &[
    (
        AppFamily::Browser,
        &["chrome", "firefox", "edge", "brave", "msedge", "opera"],
    ),
    (AppFamily::MediaPlayer, &["spotify"]),
    (AppFamily::CodeEditor, &["code", "vscode"]),
    (AppFamily::ChatClient, &["discord"]),
    (AppFamily::TextEditor, &["notepad"]),
    (AppFamily::FileBrowser, &["explorer"]),
];

/// Determine the application family for a process name
pub fn detect_family(process_name: &str) -> AppFamily {
    let name = process_name.to_lowercase();
    FAMILY_RULES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| name.contains(pattern)))
        .map(|(family, _)| *family)
        .unwrap_or(AppFamily::Generic)
}

/// Websites recognized inside a browser tab title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    YouTube,
    SpotifyWeb,
    SoundCloud,
    Netflix,
    Twitch,
    GitHub,
    Facebook,
    Twitter,
    Instagram,
    Reddit,
    StackOverflow,
    LinkedIn,
    Amazon,
    Wikipedia,
}

/// How the detail line of a site record is produced
#[derive(Clone, Copy)]
enum SiteDetail {
    /// Pull the detail out of the title
    Extract(fn(&str) -> String),
    /// Constant text
    Fixed(&'static str),
}

struct SiteRule {
    site: Site,
    /// Lowercase title substrings
    patterns: &'static [&'static str],
    headline: &'static str,
    detail: SiteDetail,
    icon_key: &'static str,
    icon_text: &'static str,
}

const SITE_RULES: &[SiteRule] = &[
    SiteRule {
        site: Site::YouTube,
        patterns: &["youtube", "youtube.com"],
        headline: "Watching YouTube",
        detail: SiteDetail::Extract(sites::youtube_title),
        icon_key: "youtube_icon",
        icon_text: "YouTube",
    },
    SiteRule {
        site: Site::SpotifyWeb,
        patterns: &["spotify", "open.spotify.com"],
        headline: "Listening to Spotify",
        detail: SiteDetail::Extract(sites::spotify_track),
        icon_key: "spotify_icon",
        icon_text: "Spotify Web Player",
    },
    SiteRule {
        site: Site::SoundCloud,
        patterns: &["soundcloud"],
        headline: "Listening on SoundCloud",
        detail: SiteDetail::Extract(sites::soundcloud_track),
        icon_key: "soundcloud_icon",
        icon_text: "SoundCloud",
    },
    SiteRule {
        site: Site::Netflix,
        patterns: &["netflix"],
        headline: "Watching Netflix",
        detail: SiteDetail::Extract(sites::netflix_show),
        icon_key: "netflix_icon",
        icon_text: "Netflix",
    },
    SiteRule {
        site: Site::Twitch,
        patterns: &["twitch"],
        headline: "Watching Twitch",
        detail: SiteDetail::Extract(sites::twitch_stream),
        icon_key: "twitch_icon",
        icon_text: "Twitch",
    },
    SiteRule {
        site: Site::GitHub,
        patterns: &["github", "github.com"],
        headline: "Browsing GitHub",
        detail: SiteDetail::Extract(sites::github_repo),
        icon_key: "github_icon",
        icon_text: "GitHub",
    },
    SiteRule {
        site: Site::Facebook,
        patterns: &["facebook", "facebook.com"],
        headline: "Browsing Facebook",
        detail: SiteDetail::Fixed("Scrolling the feed"),
        icon_key: "facebook_icon",
        icon_text: "Facebook",
    },
    SiteRule {
        site: Site::Twitter,
        patterns: &["twitter", "twitter.com", "x.com"],
        headline: "Browsing X (Twitter)",
        detail: SiteDetail::Fixed("Scrolling timeline"),
        icon_key: "twitter_icon",
        icon_text: "X (Twitter)",
    },
    SiteRule {
        site: Site::Instagram,
        patterns: &["instagram", "instagram.com"],
        headline: "Browsing Instagram",
        detail: SiteDetail::Fixed("Scrolling posts"),
        icon_key: "instagram_icon",
        icon_text: "Instagram",
    },
    SiteRule {
        site: Site::Reddit,
        patterns: &["reddit", "reddit.com"],
        headline: "Browsing Reddit",
        detail: SiteDetail::Extract(sites::reddit_subreddit),
        icon_key: "reddit_icon",
        icon_text: "Reddit",
    },
    SiteRule {
        site: Site::StackOverflow,
        patterns: &["stack overflow", "stackoverflow.com"],
        headline: "Browsing Stack Overflow",
        detail: SiteDetail::Fixed("Searching for answers"),
        icon_key: "stackoverflow_icon",
        icon_text: "Stack Overflow",
    },
    SiteRule {
        site: Site::LinkedIn,
        patterns: &["linkedin", "linkedin.com"],
        headline: "Browsing LinkedIn",
        detail: SiteDetail::Fixed("Professional networking"),
        icon_key: "linkedin_icon",
        icon_text: "LinkedIn",
    },
    SiteRule {
        site: Site::Amazon,
        patterns: &["amazon", "amazon.com"],
        headline: "Browsing Amazon",
        detail: SiteDetail::Fixed("Shopping online"),
        icon_key: "amazon_icon",
        icon_text: "Amazon",
    },
    SiteRule {
        site: Site::Wikipedia,
        patterns: &["wikipedia", "wikipedia.org"],
        headline: "Reading Wikipedia",
        detail: SiteDetail::Fixed("Learning something new"),
        icon_key: "wikipedia_icon",
        icon_text: "Wikipedia",
    },
];

fn site_rule(title: &str) -> Option<&'static SiteRule> {
    if title.is_empty() {
        return None;
    }
    let lower = title.to_lowercase();
    SITE_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|pattern| lower.contains(pattern)))
}

/// Determine which known website a browser title belongs to
pub fn detect_site(title: &str) -> Option<Site> {
    site_rule(title).map(|rule| rule.site)
}

/// Sites whose brand icon replaces the browser icon in the icon resolver
const ICON_SITES: [&str; 5] = ["youtube", "spotify", "netflix", "twitch", "soundcloud"];

const SPOTIFY_PLACEHOLDER_TITLES: [&str; 3] = ["spotify", "spotify free", "spotify premium"];

/// Small-icon key for a browser process
pub fn browser_icon_key(process_name: &str) -> &'static str {
    if process_name.contains("chrome") {
        "chrome_icon"
    } else if process_name.contains("firefox") {
        "firefox_icon"
    } else if process_name.contains("edge") || process_name.contains("msedge") {
        "edge_icon"
    } else if process_name.contains("brave") {
        "brave_icon"
    } else if process_name.contains("opera") {
        "opera_icon"
    } else {
        "browser_icon"
    }
}

/// Large-icon key used when no site matched
fn generic_browser_icon_key(process_name: &str) -> &'static str {
    if process_name.contains("chrome") {
        "chrome_icon"
    } else if process_name.contains("firefox") {
        "firefox_icon"
    } else {
        "browser_icon"
    }
}

/// Human readable browser name, e.g. "msedge" → "Edge"
pub fn browser_display_name(process_name: &str) -> String {
    capitalize_first(
        &process_name
            .replace("applicationframehost", "Edge")
            .replace("msedge", "Edge"),
    )
}

/// Record under construction, before the start time is attached
struct Presentation {
    headline: String,
    detail: String,
    icon_key: &'static str,
    icon_text: Option<String>,
    small_icon: Option<(&'static str, String)>,
}

impl Presentation {
    fn new(headline: impl Into<String>, detail: impl Into<String>, icon_key: &'static str) -> Self {
        Self {
            headline: headline.into(),
            detail: detail.into(),
            icon_key,
            icon_text: None,
            small_icon: None,
        }
    }

    fn icon_text(mut self, text: impl Into<String>) -> Self {
        self.icon_text = Some(text.into());
        self
    }

    fn small_icon(mut self, key: &'static str, text: impl Into<String>) -> Self {
        self.small_icon = Some((key, text.into()));
        self
    }

    fn into_record(self, start_time: DateTime<Utc>) -> PresenceRecord {
        let (small_icon_key, small_icon_text) = match self.small_icon {
            Some((key, text)) => (Some(key.to_string()), Some(text)),
            None => (None, None),
        };

        PresenceRecord {
            headline: self.headline,
            detail: self.detail,
            icon_key: self.icon_key.to_string(),
            icon_text: self.icon_text,
            small_icon_key,
            small_icon_text,
            start_time,
        }
    }
}

/// Rule-driven classifier for foreground activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityClassifier {
    detail_budget: usize,
}

impl ActivityClassifier {
    pub fn new(detail_budget: usize) -> Self {
        Self { detail_budget }
    }

    pub fn detail_budget(&self) -> usize {
        self.detail_budget
    }

    /// Classify an observation, stamping the record with the current time
    pub fn classify(&self, raw: &RawActivity) -> PresenceRecord {
        self.classify_at(raw, Utc::now())
    }

    /// Classify an observation with an explicit start time
    pub fn classify_at(&self, raw: &RawActivity, start_time: DateTime<Utc>) -> PresenceRecord {
        let process = raw.process_name.to_lowercase();
        let title = raw.window_title.as_str();
        let family = detect_family(&process);

        trace!("Classifying '{}' as {}", process, family.as_str());

        let presentation = match family {
            AppFamily::Browser => self.browser(&process, title),
            AppFamily::MediaPlayer => self.media_player(title),
            AppFamily::CodeEditor => self.code_editor(title),
            AppFamily::ChatClient => {
                Presentation::new("Using Discord", "Chatting", "discord_icon").icon_text("Discord")
            }
            AppFamily::TextEditor => {
                Presentation::new("Editing in Notepad", self.fit(title), "notepad_icon")
                    .icon_text("Notepad")
            }
            AppFamily::FileBrowser => {
                Presentation::new("File Explorer", self.fit(title), "explorer_icon")
                    .icon_text("File Explorer")
            }
            AppFamily::Generic => self.generic(&process, title),
        };

        presentation.into_record(start_time)
    }

    /// Icon to resolve for an observation; `None` when idle
    pub fn icon_request(&self, raw: &RawActivity) -> Option<IconRequest> {
        if raw.is_idle() {
            return None;
        }

        let process = raw.process_name.to_lowercase();
        let request = match detect_family(&process) {
            AppFamily::Browser => {
                let title = raw.window_title.to_lowercase();
                let identifier = ICON_SITES
                    .iter()
                    .find(|site| title.contains(*site))
                    .map(|site| site.to_string())
                    .unwrap_or_else(|| process.clone());
                IconRequest {
                    identifier,
                    process_name: process,
                    kind: IconRequestKind::Browser,
                }
            }
            _ => IconRequest {
                identifier: process.clone(),
                process_name: process,
                kind: IconRequestKind::Application,
            },
        };

        Some(request)
    }

    fn fit(&self, text: &str) -> String {
        extractors::truncate(text, self.detail_budget)
    }

    fn browser(&self, process: &str, title: &str) -> Presentation {
        let browser_name = browser_display_name(process);

        if let Some(rule) = site_rule(title) {
            let (headline, detail) = match (rule.site, rule.detail) {
                (Site::YouTube, _) if !sites::is_youtube_video(title) => {
                    ("Browsing YouTube".to_string(), "Looking for videos".to_string())
                }
                (_, SiteDetail::Extract(extract)) => {
                    (rule.headline.to_string(), self.fit(&extract(title)))
                }
                (_, SiteDetail::Fixed(text)) => (rule.headline.to_string(), text.to_string()),
            };

            return Presentation::new(headline, detail, rule.icon_key)
                .icon_text(rule.icon_text)
                .small_icon(browser_icon_key(process), browser_name);
        }

        let icon_key = generic_browser_icon_key(process);
        if title.is_empty() {
            Presentation::new(format!("Using {}", browser_name), "Browsing the web", icon_key)
                .icon_text(browser_name)
        } else {
            Presentation::new(
                format!("Browsing {}", sites::website_name(title)),
                self.fit(title),
                icon_key,
            )
            .icon_text(browser_name)
        }
    }

    fn media_player(&self, title: &str) -> Presentation {
        let lower = title.to_lowercase();
        if title.is_empty() || SPOTIFY_PLACEHOLDER_TITLES.contains(&lower.as_str()) {
            return Presentation::new("Using Spotify", "Browsing music", "spotify_icon")
                .icon_text("Spotify");
        }

        // The desktop client already formats its title as "Artist - Song"
        Presentation::new("Listening to Spotify", self.fit(title), "spotify_icon")
            .icon_text("Spotify Desktop")
    }

    fn code_editor(&self, title: &str) -> Presentation {
        let file = editor::file_name(title);
        let language = editor::language_for_extension(&editor::file_extension(file));

        let detail = if file.is_empty() {
            "Working on a project".to_string()
        } else {
            self.fit(file)
        };

        Presentation::new(format!("Coding in {}", language.name), detail, language.icon_key)
            .icon_text(language.name)
            .small_icon("vscode_icon", "Visual Studio Code")
    }

    fn generic(&self, process: &str, title: &str) -> Presentation {
        if title.is_empty() {
            return Presentation::new("On Desktop", "Idle", "default_icon");
        }

        let app_name = capitalize_first(process);
        Presentation::new(format!("Using {}", app_name), self.fit(title), "default_icon")
            .icon_text(app_name)
    }
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        Self::new(DETAIL_BUDGET)
    }
}

/// Classify with the default detail budget
pub fn classify(process_name: &str, window_title: &str) -> PresenceRecord {
    ActivityClassifier::default().classify(&RawActivity::new(process_name, window_title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(process: &str, title: &str) -> PresenceRecord {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        ActivityClassifier::default().classify_at(&RawActivity::new(process, title), start)
    }

    #[test]
    fn test_family_detection() {
        assert_eq!(detect_family("chrome"), AppFamily::Browser);
        assert_eq!(detect_family("MSEdge"), AppFamily::Browser);
        assert_eq!(detect_family("opera_gx"), AppFamily::Browser);
        assert_eq!(detect_family("spotify"), AppFamily::MediaPlayer);
        assert_eq!(detect_family("code"), AppFamily::CodeEditor);
        assert_eq!(detect_family("code - insiders"), AppFamily::CodeEditor);
        assert_eq!(detect_family("discord"), AppFamily::ChatClient);
        assert_eq!(detect_family("notepad++"), AppFamily::TextEditor);
        assert_eq!(detect_family("explorer"), AppFamily::FileBrowser);
        assert_eq!(detect_family("blender"), AppFamily::Generic);
    }

    #[test]
    fn test_site_priority_order() {
        // YouTube is checked before Spotify
        assert_eq!(detect_site("Spotify playlist - YouTube"), Some(Site::YouTube));
        assert_eq!(detect_site("rust-lang/rust · GitHub"), Some(Site::GitHub));
        assert_eq!(detect_site("Home / x.com"), Some(Site::Twitter));
        assert_eq!(detect_site("Questions - Stack Overflow"), Some(Site::StackOverflow));
        assert_eq!(detect_site("Rust (programming language) - Wikipedia"), Some(Site::Wikipedia));
        assert_eq!(detect_site("New Tab"), None);
        assert_eq!(detect_site(""), None);
    }

    #[test]
    fn test_netflix_in_chrome() {
        let record = at("chrome", "Breaking Bad - Netflix");
        assert_eq!(record.headline, "Watching Netflix");
        assert_eq!(record.detail, "Breaking Bad");
        assert_eq!(record.icon_key, "netflix_icon");
        assert_eq!(record.icon_text.as_deref(), Some("Netflix"));
        assert_eq!(record.small_icon_key.as_deref(), Some("chrome_icon"));
        assert_eq!(record.small_icon_text.as_deref(), Some("Chrome"));
    }

    #[test]
    fn test_rust_in_vscode() {
        let record = at("code", "main.rs - myproject - Visual Studio Code");
        assert_eq!(record.headline, "Coding in Rust");
        assert_eq!(record.detail, "main.rs");
        assert_eq!(record.icon_key, "rust_icon");
        assert_eq!(record.small_icon_key.as_deref(), Some("vscode_icon"));
        assert_eq!(record.small_icon_text.as_deref(), Some("Visual Studio Code"));
    }

    #[test]
    fn test_explorer_empty_title() {
        let record = at("explorer", "");
        assert_eq!(record.headline, "File Explorer");
        assert_eq!(record.detail, "");
        assert_eq!(record.icon_key, "explorer_icon");
    }

    #[test]
    fn test_youtube_video_vs_browsing() {
        let video = at("firefox", "Rick Astley - Never Gonna Give You Up - YouTube");
        assert_eq!(video.headline, "Watching YouTube");
        assert_eq!(video.detail, "Rick Astley - Never Gonna Give You Up");
        assert_eq!(video.small_icon_key.as_deref(), Some("firefox_icon"));

        let home = at("firefox", "YouTube");
        assert_eq!(home.headline, "Browsing YouTube");
        assert_eq!(home.detail, "Looking for videos");
    }

    #[test]
    fn test_fixed_detail_sites() {
        let record = at("brave", "(3) Facebook");
        assert_eq!(record.headline, "Browsing Facebook");
        assert_eq!(record.detail, "Scrolling the feed");
        assert_eq!(record.small_icon_key.as_deref(), Some("brave_icon"));

        let record = at("opera", "Amazon.com: Online Shopping");
        assert_eq!(record.headline, "Browsing Amazon");
        assert_eq!(record.small_icon_key.as_deref(), Some("opera_icon"));
    }

    #[test]
    fn test_reddit_in_edge() {
        let record = at("msedge", "Cool post : r/programming - Reddit");
        assert_eq!(record.headline, "Browsing Reddit");
        assert_eq!(record.detail, "r/programming - Reddit");
        assert_eq!(record.small_icon_key.as_deref(), Some("edge_icon"));
        assert_eq!(record.small_icon_text.as_deref(), Some("Edge"));
    }

    #[test]
    fn test_generic_browser_tab() {
        let record = at("chrome", "Release notes - Rust Blog");
        assert_eq!(record.headline, "Browsing Rust Blog");
        assert_eq!(record.detail, "Release notes - Rust Blog");
        assert_eq!(record.icon_key, "chrome_icon");
        assert_eq!(record.small_icon_key, None);

        let record = at("msedge", "New Tab");
        assert_eq!(record.headline, "Browsing the web");
        assert_eq!(record.icon_key, "browser_icon");
    }

    #[test]
    fn test_empty_browser_title() {
        let record = at("firefox", "");
        assert_eq!(record.headline, "Using Firefox");
        assert_eq!(record.detail, "Browsing the web");
        assert_eq!(record.icon_key, "firefox_icon");
    }

    #[test]
    fn test_browser_display_name() {
        assert_eq!(browser_display_name("msedge"), "Edge");
        assert_eq!(browser_display_name("applicationframehost"), "Edge");
        assert_eq!(browser_display_name("chrome"), "Chrome");
    }

    #[test]
    fn test_spotify_desktop() {
        let playing = at("spotify", "Daft Punk - One More Time");
        assert_eq!(playing.headline, "Listening to Spotify");
        assert_eq!(playing.detail, "Daft Punk - One More Time");
        assert_eq!(playing.icon_text.as_deref(), Some("Spotify Desktop"));

        for title in ["", "Spotify", "Spotify Free", "spotify premium"] {
            let idle = at("spotify", title);
            assert_eq!(idle.headline, "Using Spotify", "title {:?}", title);
            assert_eq!(idle.detail, "Browsing music");
        }
    }

    #[test]
    fn test_code_editor_fallbacks() {
        let record = at("code", "Visual Studio Code");
        assert_eq!(record.headline, "Coding in VS Code");
        assert_eq!(record.detail, "Visual Studio Code");
        assert_eq!(record.icon_key, "vscode_icon");

        let record = at("code", "");
        assert_eq!(record.detail, "Working on a project");

        let record = at("code", "App.TSX - web - Visual Studio Code");
        assert_eq!(record.headline, "Coding in React TSX");
        assert_eq!(record.icon_key, "react_icon");
    }

    #[test]
    fn test_fixed_apps() {
        let discord = at("discord", "#general - Server");
        assert_eq!(discord.headline, "Using Discord");
        assert_eq!(discord.detail, "Chatting");

        let notepad = at("notepad", "todo.txt - Notepad");
        assert_eq!(notepad.headline, "Editing in Notepad");
        assert_eq!(notepad.detail, "todo.txt - Notepad");
    }

    #[test]
    fn test_generic_app_and_idle() {
        let record = at("blender", "scene.blend");
        assert_eq!(record.headline, "Using Blender");
        assert_eq!(record.detail, "scene.blend");
        assert_eq!(record.icon_key, "default_icon");
        assert_eq!(record.icon_text.as_deref(), Some("Blender"));

        let idle = at("idle", "");
        assert_eq!(idle.headline, "On Desktop");
        assert_eq!(idle.detail, "Idle");
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let title = format!("{} - Netflix", "A".repeat(300));
        let record = at("chrome", &title);
        assert_eq!(record.detail.chars().count(), DETAIL_BUDGET);
        assert!(record.detail.ends_with("..."));

        let record = at("notepad", &"b".repeat(500));
        assert_eq!(record.detail.chars().count(), DETAIL_BUDGET);
    }

    #[test]
    fn test_custom_detail_budget() {
        let classifier = ActivityClassifier::new(10);
        let record = classifier.classify(&RawActivity::new("notepad", "a very long file name.txt"));
        assert_eq!(record.detail, "a very ...");
    }

    #[test]
    fn test_classification_is_deterministic_and_total() {
        let inputs = [
            ("chrome", ""),
            ("", ""),
            ("", "title"),
            ("code", " - "),
            ("firefox", " : r/"),
            ("spotify", "   "),
            ("explorer", "C:\\Users"),
            ("weird.exe", "ünïcödé — title"),
            ("chrome", "   - Netflix"),
            ("chrome", "  · GitHub"),
            ("chrome", "  - YouTube"),
            ("chrome", "   - Twitch"),
            ("chrome", "  - Spotify"),
            ("firefox", "Docs -    "),
        ];
        for (process, title) in inputs {
            let first = at(process, title);
            let second = at(process, title);
            assert_eq!(first, second);
            assert!(!first.headline.is_empty(), "{:?}", (process, title));
            if !title.trim().is_empty() {
                assert!(!first.detail.is_empty(), "{:?}", (process, title));
            }
            assert!(first.detail.chars().count() <= DETAIL_BUDGET);
        }
    }

    #[test]
    fn test_classify_reuses_display_fields() {
        let a = classify("chrome", "Breaking Bad - Netflix");
        let b = classify("chrome", "Breaking Bad - Netflix");
        assert!(a.same_display(&b));
    }

    #[test]
    fn test_icon_request_for_browser_sites() {
        let classifier = ActivityClassifier::default();

        let request = classifier
            .icon_request(&RawActivity::new("chrome", "Some video - YouTube"))
            .unwrap();
        assert_eq!(request.identifier, "youtube");
        assert_eq!(request.kind, IconRequestKind::Browser);

        let request = classifier
            .icon_request(&RawActivity::new("firefox", "Docs - Rust Blog"))
            .unwrap();
        assert_eq!(request.identifier, "firefox");
        assert_eq!(request.process_name, "firefox");
    }

    #[test]
    fn test_icon_request_for_applications() {
        let classifier = ActivityClassifier::default();

        let request = classifier
            .icon_request(&RawActivity::new("Blender", "scene"))
            .unwrap();
        assert_eq!(request.identifier, "blender");
        assert_eq!(request.kind, IconRequestKind::Application);

        assert!(classifier.icon_request(&RawActivity::idle()).is_none());
    }
}
