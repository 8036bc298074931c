//! Core types used throughout the presence pipeline.
//!
//! This module defines the raw window observation, the change-detection
//! identity, the display-ready presence record, icon cache entries, and the
//! error types shared between the classifier, the icon resolver and the sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Process identifier as reported by the host OS
pub type ProcessId = u32;

/// Separator between process name and title inside an [`ActivityIdentity`]
pub const IDENTITY_SEPARATOR: &str = "|||";

/// Process name reported when the foreground process cannot be resolved
pub const IDLE_PROCESS: &str = "idle";

/// One observation of the foreground window, produced once per poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawActivity {
    /// Lowercased process name without executable extension
    pub process_name: String,
    /// Foreground window title, verbatim
    pub window_title: String,
}

impl RawActivity {
    pub fn new(process_name: impl Into<String>, window_title: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into().to_lowercase(),
            window_title: window_title.into(),
        }
    }

    /// Activity used when the foreground process vanished or no window is focused
    pub fn idle() -> Self {
        Self::new(IDLE_PROCESS, "")
    }

    pub fn is_idle(&self) -> bool {
        self.process_name == IDLE_PROCESS && self.window_title.is_empty()
    }

    /// Change-detection key for this observation
    pub fn identity(&self) -> ActivityIdentity {
        ActivityIdentity(format!(
            "{}{}{}",
            self.process_name, IDENTITY_SEPARATOR, self.window_title
        ))
    }
}

/// Composite `process|||title` key. Never displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityIdentity(String);

impl ActivityIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display-ready summary of the current activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// First line, e.g. "Watching Netflix"
    pub headline: String,
    /// Second line, truncated to the detail budget
    pub detail: String,
    /// Large image asset key
    pub icon_key: String,
    /// Hover text for the large image
    pub icon_text: Option<String>,
    /// Small image asset key (browser or editor brand)
    pub small_icon_key: Option<String>,
    /// Hover text for the small image
    pub small_icon_text: Option<String>,
    /// When the current activity identity was first observed
    pub start_time: DateTime<Utc>,
}

impl PresenceRecord {
    /// Compare everything except the start time
    pub fn same_display(&self, other: &PresenceRecord) -> bool {
        self.headline == other.headline
            && self.detail == other.detail
            && self.icon_key == other.icon_key
            && self.icon_text == other.icon_text
            && self.small_icon_key == other.small_icon_key
            && self.small_icon_text == other.small_icon_text
    }

    /// Time spent on this activity as of `now`
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.start_time)
    }
}

/// Where a resolved icon came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconSource {
    Memory,
    Disk,
    Remote,
    Executable,
}

impl IconSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconSource::Memory => "memory",
            IconSource::Disk => "disk",
            IconSource::Remote => "remote",
            IconSource::Executable => "executable",
        }
    }
}

/// PNG-encoded icon owned by the icon cache.
///
/// Cloning is cheap: the image bytes are shared, so a handle returned to a
/// caller stays valid after the cache is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCacheEntry {
    pub identifier: String,
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
    pub source: IconSource,
}

impl IconCacheEntry {
    /// Same entry, reported as coming from `source`
    pub fn with_source(&self, source: IconSource) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }
}

/// What kind of activity an icon is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconRequestKind {
    /// Site or browser brand; network sources only
    Browser,
    /// Desktop application; executable icon is tried before the network
    Application,
}

/// Input to the icon resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    /// Cache key and remote-lookup hint, e.g. "youtube" or "notepad"
    pub identifier: String,
    /// Process the activity belongs to
    pub process_name: String,
    pub kind: IconRequestKind,
}

/// The foreground process exited between the window query and the name lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Process {pid} not found")]
pub struct ProcessLookupError {
    pub pid: ProcessId,
}

/// A single icon candidate failed; the resolver moves on to the next one
#[derive(Debug, thiserror::Error)]
pub enum IconSourceError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned an empty body")]
    EmptyBody { url: String },

    #[error("Could not decode image from {origin}: {message}")]
    Decode { origin: String, message: String },

    #[error("Image from {origin} is a {width}x{height} placeholder")]
    Placeholder {
        origin: String,
        width: u32,
        height: u32,
    },
}

/// Errors raised by the icon cache and resolver
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("All icon sources failed for {0}")]
    Exhausted(String),

    #[error("Failed to persist icon {identifier}: {source}")]
    CacheWrite {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The presence sink rejected an update
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Presence channel closed")]
    Closed,

    #[error("Transport error: {0}")]
    Transport(String),
}
