//! Two-level icon cache.
//!
//! Memory holds every icon resolved during this run; disk keeps one PNG per
//! identifier across runs. Disk writes are best-effort and atomic (temp file
//! then rename), so a crash never leaves a truncated PNG behind.

use super::NormalizedIcon;
use crate::types::{IconCacheEntry, IconError, IconSource};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Characters that cannot appear in a file name on any supported platform
const INVALID_FILE_NAME_CHARS: [char; 9] = ['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Used when sanitizing leaves nothing
const EMPTY_NAME: &str = "_";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Turn an identifier into a safe file stem.
///
/// Invalid characters split the identifier; the non-empty parts are joined
/// with `_` and trailing dots are removed.
pub fn sanitize_file_name(identifier: &str) -> String {
    let joined = identifier
        .split(|c: char| INVALID_FILE_NAME_CHARS.contains(&c) || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let trimmed = joined.trim_end_matches('.');
    if trimmed.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Default on-disk location, e.g. `~/.local/share/activity-presence/icons`
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("activity-presence").join("icons"))
}

/// Memory + disk icon cache
pub struct IconCache {
    dir: PathBuf,
    memory: RwLock<HashMap<String, IconCacheEntry>>,
}

impl IconCache {
    /// Open a cache rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, IconError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!("Icon cache directory: {:?}", dir);

        Ok(Self {
            dir,
            memory: RwLock::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Disk location for an identifier
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir
            .join(format!("{}.png", sanitize_file_name(identifier)))
    }

    /// Memory lookup
    pub async fn get_memory(&self, identifier: &str) -> Option<IconCacheEntry> {
        self.memory
            .read()
            .await
            .get(identifier)
            .map(|entry| entry.with_source(IconSource::Memory))
    }

    /// Disk lookup. A readable, decodable file is promoted into memory.
    pub async fn load_disk(&self, identifier: &str) -> Option<IconCacheEntry> {
        let path = self.path_for(identifier);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read cached icon {:?}: {}", path, e);
                return None;
            }
        };

        let image = match image::load_from_memory(&bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("Ignoring undecodable cached icon {:?}: {}", path, e);
                return None;
            }
        };

        let entry = IconCacheEntry {
            identifier: identifier.to_string(),
            bytes: Arc::from(bytes),
            width: image.width(),
            height: image.height(),
            source: IconSource::Disk,
        };

        let stored = self.insert_if_absent(entry).await;
        Some(stored.with_source(IconSource::Disk))
    }

    /// Store a freshly fetched icon: persist to disk, then publish in memory.
    ///
    /// If another task stored the same identifier first, that entry wins and
    /// is returned.
    pub async fn store(
        &self,
        identifier: &str,
        icon: NormalizedIcon,
        source: IconSource,
    ) -> IconCacheEntry {
        if let Err(e) = self.write_disk(identifier, &icon.png).await {
            warn!("{}", e);
        }

        let entry = IconCacheEntry {
            identifier: identifier.to_string(),
            bytes: Arc::from(icon.png),
            width: icon.width,
            height: icon.height,
            source,
        };

        self.insert_if_absent(entry).await
    }

    /// Drop every cached icon from memory and disk
    pub async fn clear(&self) -> Result<(), IconError> {
        let mut memory = self.memory.write().await;
        let dropped = memory.len();
        memory.clear();

        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(IconError::Io(e)),
        }
        tokio::fs::create_dir_all(&self.dir).await?;

        info!("Cleared icon cache ({} in memory)", dropped);
        Ok(())
    }

    /// Number of icons held in memory
    pub async fn len(&self) -> usize {
        self.memory.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memory.read().await.is_empty()
    }

    async fn insert_if_absent(&self, entry: IconCacheEntry) -> IconCacheEntry {
        let mut memory = self.memory.write().await;
        memory
            .entry(entry.identifier.clone())
            .or_insert(entry)
            .clone()
    }

    async fn write_disk(&self, identifier: &str, png: &[u8]) -> Result<(), IconError> {
        let path = self.path_for(identifier);
        let temp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            sanitize_file_name(identifier),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let cache_write = |source| IconError::CacheWrite {
            identifier: identifier.to_string(),
            source,
        };

        tokio::fs::write(&temp, png).await.map_err(cache_write)?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(cache_write(e));
        }

        debug!("Persisted icon {} to {:?}", identifier, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::normalize_icon;
    use crate::icons::test_support::png;
    use tempfile::TempDir;

    fn icon(width: u32, height: u32) -> NormalizedIcon {
        normalize_icon(&png(width, height), "test").unwrap()
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("youtube"), "youtube");
        assert_eq!(
            sanitize_file_name("https://example.com/path"),
            "https_example.com_path"
        );
        assert_eq!(sanitize_file_name("what?*ever"), "what_ever");
        assert_eq!(sanitize_file_name("name..."), "name");
        assert_eq!(sanitize_file_name("a\tb"), "a_b");
        assert_eq!(sanitize_file_name("://"), EMPTY_NAME);
    }

    #[test]
    fn test_path_for() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path()).unwrap();
        assert_eq!(cache.path_for("notepad"), dir.path().join("notepad.png"));
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("icons");
        let cache = IconCache::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(cache.dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_store_then_memory_hit() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path()).unwrap();

        let stored = cache.store("youtube", icon(16, 16), IconSource::Remote).await;
        assert_eq!(stored.source, IconSource::Remote);
        assert!(cache.path_for("youtube").exists());

        let hit = cache.get_memory("youtube").await.unwrap();
        assert_eq!(hit.source, IconSource::Memory);
        assert!(Arc::ptr_eq(&hit.bytes, &stored.bytes));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path()).unwrap();
        cache.store("a", icon(4, 4), IconSource::Remote).await;
        cache.store("b", icon(4, 4), IconSource::Executable).await;

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.ends_with(".png")));
    }

    #[tokio::test]
    async fn test_first_store_wins() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path()).unwrap();

        let first = cache.store("spotify", icon(8, 8), IconSource::Remote).await;
        let second = cache.store("spotify", icon(32, 32), IconSource::Remote).await;
        assert_eq!(second.width, 8);
        assert!(Arc::ptr_eq(&first.bytes, &second.bytes));
    }

    #[tokio::test]
    async fn test_disk_survives_restart() {
        let dir = TempDir::new().unwrap();
        {
            let cache = IconCache::new(dir.path()).unwrap();
            cache.store("netflix", icon(24, 24), IconSource::Remote).await;
        }

        let cache = IconCache::new(dir.path()).unwrap();
        assert!(cache.get_memory("netflix").await.is_none());

        let hit = cache.load_disk("netflix").await.unwrap();
        assert_eq!(hit.source, IconSource::Disk);
        assert_eq!((hit.width, hit.height), (24, 24));
        // promoted into memory
        assert!(cache.get_memory("netflix").await.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_disk_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path()).unwrap();
        std::fs::write(cache.path_for("broken"), b"not a png").unwrap();

        assert!(cache.load_disk("broken").await.is_none());
        assert!(cache.load_disk("missing").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_keeps_handed_out_bytes() {
        let dir = TempDir::new().unwrap();
        let cache = IconCache::new(dir.path()).unwrap();

        let entry = cache.store("twitch", icon(16, 16), IconSource::Remote).await;
        cache.clear().await.unwrap();

        assert!(cache.is_empty().await);
        assert!(!cache.path_for("twitch").exists());
        assert!(dir.path().is_dir());
        assert!(image::load_from_memory(&entry.bytes).is_ok());
    }
}
