//! Activity Presence - Foreground activity classifier and icon resolver
//!
//! This crate turns the focused desktop window into a display-ready presence
//! record ("Watching Netflix", "Coding in Rust") and resolves an icon for it:
//!
//! - **Classifier**: ordered process-family and website rules with title
//!   extractors for videos, songs, repositories and source files
//! - **Change detection**: one record per activity change, with a start time
//!   that survives repeated polls of the same window
//! - **Icons**: memory → disk → executable → remote favicon lookup with
//!   write-through caching
//!
//! # Architecture
//!
//! The [`PresenceRouter`] polls the [`WindowTracker`] on a fixed interval,
//! runs the [`ChangeDetector`], publishes changed records through a
//! [`PresenceSink`](publisher::PresenceSink) and spawns icon resolution in
//! the background. Resolved icons are delivered on a channel.

pub mod change_detector;
pub mod classifier;
pub mod config;
pub mod extractors;
pub mod icons;
pub mod publisher;
pub mod router;
pub mod types;
pub mod window_tracker;

// Re-export commonly used types
pub use change_detector::ChangeDetector;
pub use classifier::{classify, detect_family, detect_site, ActivityClassifier, AppFamily, Site};
pub use config::Config;
pub use icons::{IconCache, IconResolver, Refresh};
pub use publisher::{ChannelSink, IconDisplay, IconUpdate, LogSink, PresenceSink};
pub use router::{PresenceRouter, RouterStatus};
pub use types::{
    ActivityIdentity, IconCacheEntry, IconError, IconRequest, IconRequestKind, IconSource,
    IconSourceError, PresenceRecord, ProcessLookupError, PublishError, RawActivity,
};
pub use window_tracker::WindowTracker;
