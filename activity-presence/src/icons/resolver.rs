//! Layered icon lookup.
//!
//! Lookup order, first hit wins:
//! 1. memory
//! 2. disk
//! 3. executable icon (application requests only)
//! 4. remote candidates, each with its own timeout
//!
//! Anything found in steps 3 or 4 is written through to the cache.

use super::cache::IconCache;
use super::normalize_icon;
use super::sources::{candidate_urls, ExecutableIconSource, IconFetcher, DEFAULT_FAVICON_SIZE};
use crate::types::{
    IconCacheEntry, IconError, IconRequest, IconRequestKind, IconSource, IconSourceError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

/// Default per-candidate fetch timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of [`IconResolver::resolve_if_changed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// A new icon is available for display
    Resolved(IconCacheEntry),
    /// Same identifier as the last resolution; nothing to do
    Unchanged,
    /// Every source failed; keep showing the previous icon
    Absent,
}

pub struct IconResolver {
    cache: Arc<IconCache>,
    fetcher: Arc<dyn IconFetcher>,
    executables: Arc<dyn ExecutableIconSource>,
    fetch_timeout: Duration,
    favicon_size: u32,
    /// Identifier most recently claimed by `resolve_if_changed`
    last_resolved: Mutex<Option<String>>,
}

impl IconResolver {
    pub fn new(
        cache: Arc<IconCache>,
        fetcher: Arc<dyn IconFetcher>,
        executables: Arc<dyn ExecutableIconSource>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            executables,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            favicon_size: DEFAULT_FAVICON_SIZE,
            last_resolved: Mutex::new(None),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_favicon_size(mut self, size: u32) -> Self {
        self.favicon_size = size;
        self
    }

    pub fn cache(&self) -> &Arc<IconCache> {
        &self.cache
    }

    /// Resolve an icon through every layer. `None` means all sources failed.
    pub async fn resolve(&self, request: &IconRequest) -> Option<IconCacheEntry> {
        let identifier = request.identifier.as_str();

        if let Some(entry) = self.cache.get_memory(identifier).await {
            trace!("Icon {} served from memory", identifier);
            return Some(entry);
        }

        if let Some(entry) = self.cache.load_disk(identifier).await {
            debug!("Icon {} loaded from disk", identifier);
            return Some(entry);
        }

        if request.kind == IconRequestKind::Application {
            if let Some(entry) = self.from_executable(request).await {
                return Some(entry);
            }
        }

        if let Some(entry) = self.from_remote(identifier).await {
            return Some(entry);
        }

        debug!("{}", IconError::Exhausted(identifier.to_string()));
        None
    }

    /// Resolve unless this identifier was the last one resolved.
    ///
    /// The identifier is claimed before any I/O so concurrent requests for the
    /// same icon do not both go to the network. The claim is released when
    /// every source fails, allowing a later activity change to retry.
    pub async fn resolve_if_changed(&self, request: &IconRequest) -> Refresh {
        {
            let mut last = self.last_resolved.lock().await;
            if last.as_deref() == Some(request.identifier.as_str()) {
                trace!("Icon {} already resolved", request.identifier);
                return Refresh::Unchanged;
            }
            *last = Some(request.identifier.clone());
        }

        match self.resolve(request).await {
            Some(entry) => Refresh::Resolved(entry),
            None => {
                let mut last = self.last_resolved.lock().await;
                if last.as_deref() == Some(request.identifier.as_str()) {
                    *last = None;
                }
                Refresh::Absent
            }
        }
    }

    /// Clear both cache layers and forget the last resolved identifier
    pub async fn clear_cache(&self) -> Result<(), IconError> {
        self.cache.clear().await?;
        *self.last_resolved.lock().await = None;
        Ok(())
    }

    pub async fn last_resolved(&self) -> Option<String> {
        self.last_resolved.lock().await.clone()
    }

    async fn from_executable(&self, request: &IconRequest) -> Option<IconCacheEntry> {
        let source = Arc::clone(&self.executables);
        let process_name = request.process_name.clone();

        let bytes = match tokio::task::spawn_blocking(move || source.icon_bytes(&process_name)).await
        {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                debug!("Executable icon lookup for {} panicked: {}", request.process_name, e);
                return None;
            }
        };

        let origin = format!("executable:{}", request.process_name);
        match normalize_icon(&bytes, &origin) {
            Ok(icon) => {
                info!("Resolved icon {} from executable", request.identifier);
                Some(
                    self.cache
                        .store(&request.identifier, icon, IconSource::Executable)
                        .await,
                )
            }
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }

    async fn from_remote(&self, identifier: &str) -> Option<IconCacheEntry> {
        for url in candidate_urls(identifier, self.favicon_size) {
            match self.fetch_candidate(&url).await {
                Ok(icon) => {
                    info!("Resolved icon {} from {}", identifier, url);
                    return Some(self.cache.store(identifier, icon, IconSource::Remote).await);
                }
                Err(e) => debug!("Icon candidate skipped: {}", e),
            }
        }
        None
    }

    async fn fetch_candidate(&self, url: &str) -> Result<super::NormalizedIcon, IconSourceError> {
        let bytes = tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(url))
            .await
            .map_err(|_| IconSourceError::Timeout {
                url: url.to_string(),
            })??;

        normalize_icon(&bytes, url)
    }
}
