//! Main routing logic for the presence service.
//!
//! One `tick` polls the foreground window, runs change detection and, when
//! the activity changed, publishes the new record and spawns an icon refresh.
//! Icon resolution never blocks the tick; results arrive on the icon channel
//! tagged with a generation number.

use crate::change_detector::ChangeDetector;
use crate::classifier::ActivityClassifier;
use crate::config::{Config, IconsConfig};
use crate::icons::{HttpIconFetcher, IconCache, IconResolver, Refresh, SystemExecutableIcons};
use crate::publisher::{IconUpdate, PresenceSink};
use crate::types::{IconError, IconRequest, PresenceRecord};
use crate::window_tracker::WindowTracker;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Build the icon resolver described by `config`; `None` when icons are off
pub fn build_icon_resolver(config: &IconsConfig) -> Result<Option<IconResolver>, IconError> {
    if !config.enabled {
        info!("Icon resolution disabled");
        return Ok(None);
    }

    let dir = config.cache_dir().ok_or_else(|| {
        IconError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no local data directory for the icon cache",
        ))
    })?;

    let cache = Arc::new(IconCache::new(dir)?);
    let fetcher = Arc::new(HttpIconFetcher::new(
        config.fetch_timeout(),
        &config.user_agent,
    )?);

    let resolver = IconResolver::new(cache, fetcher, Arc::new(SystemExecutableIcons::new()))
        .with_fetch_timeout(config.fetch_timeout())
        .with_favicon_size(config.favicon_size);

    Ok(Some(resolver))
}

/// Foreground activity → presence pipeline
pub struct PresenceRouter {
    /// Window tracker
    window_tracker: WindowTracker,
    /// Identity-based change detector
    change_detector: ChangeDetector,
    /// Presence destination
    sink: Arc<dyn PresenceSink>,
    /// Icon resolver, absent when icons are disabled
    resolver: Option<Arc<IconResolver>>,
    /// Channel for resolved icons
    icon_tx: mpsc::Sender<IconUpdate>,
    /// Generation of the most recent icon request
    icon_generation: u64,
    /// Successfully published records
    published: u64,
    /// Records the sink rejected
    publish_failures: u64,
    /// Whether the router is paused
    paused: bool,
    /// Last tick time
    last_tick: Instant,
}

impl PresenceRouter {
    pub fn new(
        window_tracker: WindowTracker,
        change_detector: ChangeDetector,
        sink: Arc<dyn PresenceSink>,
        icon_tx: mpsc::Sender<IconUpdate>,
    ) -> Self {
        Self {
            window_tracker,
            change_detector,
            sink,
            resolver: None,
            icon_tx,
            icon_generation: 0,
            published: 0,
            publish_failures: 0,
            paused: false,
            last_tick: Instant::now(),
        }
    }

    /// Router for the real desktop, configured from `config`
    pub fn from_config(
        config: &Config,
        sink: Arc<dyn PresenceSink>,
        icon_tx: mpsc::Sender<IconUpdate>,
    ) -> Result<Self, IconError> {
        let classifier = ActivityClassifier::new(config.classification.detail_budget);
        let router = Self::new(
            WindowTracker::new(),
            ChangeDetector::new(classifier),
            sink,
            icon_tx,
        );

        Ok(match build_icon_resolver(&config.icons)? {
            Some(resolver) => router.with_resolver(Arc::new(resolver)),
            None => router,
        })
    }

    pub fn with_resolver(mut self, resolver: Arc<IconResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Run one tick of the router.
    ///
    /// Returns the new record when the activity changed.
    pub async fn tick(&mut self) -> Option<PresenceRecord> {
        if self.paused {
            return None;
        }

        let now = Instant::now();
        trace!("Router tick, elapsed: {:?}", now.duration_since(self.last_tick));
        self.last_tick = now;

        let raw = self.window_tracker.poll();
        let record = self.change_detector.observe(&raw)?;

        match self.sink.set_presence(&record).await {
            Ok(()) => self.published += 1,
            Err(e) => {
                self.publish_failures += 1;
                warn!("Failed to publish presence: {}", e);
            }
        }

        if let Some(request) = self.change_detector.classifier().icon_request(&raw) {
            self.icon_generation += 1;
            self.spawn_icon_refresh(request, self.icon_generation);
        }

        Some(record)
    }

    fn spawn_icon_refresh(&self, request: IconRequest, generation: u64) {
        let resolver = match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => return,
        };
        let icon_tx = self.icon_tx.clone();

        tokio::spawn(async move {
            match resolver.resolve_if_changed(&request).await {
                Refresh::Resolved(icon) => {
                    let update = IconUpdate {
                        generation,
                        identifier: request.identifier.clone(),
                        icon,
                    };
                    if icon_tx.send(update).await.is_err() {
                        debug!("Icon channel closed, dropping {}", request.identifier);
                    }
                }
                Refresh::Unchanged => trace!("Icon {} unchanged", request.identifier),
                Refresh::Absent => debug!("No icon available for {}", request.identifier),
            }
        });
    }

    /// Clear the icon cache, if icons are enabled
    pub async fn clear_icon_cache(&self) -> Result<(), IconError> {
        match &self.resolver {
            Some(resolver) => resolver.clear_cache().await,
            None => Ok(()),
        }
    }

    /// Pause the router
    pub fn pause(&mut self) {
        info!("Router paused");
        self.paused = true;
    }

    /// Resume the router; the next tick republishes the current activity
    pub fn resume(&mut self) {
        info!("Router resumed");
        self.paused = false;
        self.change_detector.reset();
    }

    /// Check if router is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get router status
    pub fn status(&self) -> RouterStatus {
        RouterStatus {
            paused: self.paused,
            current: self.change_detector.current().cloned(),
            changes: self.change_detector.change_count(),
            published: self.published,
            publish_failures: self.publish_failures,
            icon_generation: self.icon_generation,
        }
    }
}

/// Router status information
#[derive(Debug, Clone, Serialize)]
pub struct RouterStatus {
    pub paused: bool,
    pub current: Option<PresenceRecord>,
    pub changes: u64,
    pub published: u64,
    pub publish_failures: u64,
    pub icon_generation: u64,
}
