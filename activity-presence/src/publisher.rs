//! Presence publishing.
//!
//! Records go out through a [`PresenceSink`]; resolved icons travel
//! separately as [`IconUpdate`]s because they arrive later, from background
//! tasks, and possibly out of order.

use crate::types::{IconCacheEntry, PresenceRecord, PublishError};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info};

/// Destination for presence records
#[async_trait]
pub trait PresenceSink: Send + Sync {
    async fn set_presence(&self, record: &PresenceRecord) -> Result<(), PublishError>;
}

/// Logs every record
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl PresenceSink for LogSink {
    async fn set_presence(&self, record: &PresenceRecord) -> Result<(), PublishError> {
        info!(
            "Presence: {} | {} [{}]",
            record.headline, record.detail, record.icon_key
        );
        Ok(())
    }
}

/// Logs every record and forwards it to a channel.
///
/// Never waits for the consumer: a full channel is reported as a transport
/// error and the record is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<PresenceRecord>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<PresenceRecord>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, with room for `capacity` pending records
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PresenceRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl PresenceSink for ChannelSink {
    async fn set_presence(&self, record: &PresenceRecord) -> Result<(), PublishError> {
        LogSink.set_presence(record).await?;
        self.tx.try_send(record.clone()).map_err(|e| match e {
            TrySendError::Full(_) => PublishError::Transport("presence channel full".to_string()),
            TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

/// Icon resolved for an activity change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconUpdate {
    /// Increases with every activity change that requested an icon
    pub generation: u64,
    pub identifier: String,
    pub icon: IconCacheEntry,
}

/// Presentation-side icon state.
///
/// Applies an update only if it is newer than the last one applied, so a slow
/// resolution for an old activity cannot overwrite the icon of a newer one.
#[derive(Debug, Default)]
pub struct IconDisplay {
    applied_generation: Option<u64>,
    current: Option<IconUpdate>,
}

impl IconDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an update; returns `false` when it was stale and dropped
    pub fn apply(&mut self, update: IconUpdate) -> bool {
        if let Some(applied) = self.applied_generation {
            if update.generation <= applied {
                debug!(
                    "Dropping stale icon {} (generation {} <= {})",
                    update.identifier, update.generation, applied
                );
                return false;
            }
        }

        self.applied_generation = Some(update.generation);
        self.current = Some(update);
        true
    }

    pub fn current(&self) -> Option<&IconUpdate> {
        self.current.as_ref()
    }

    pub fn applied_generation(&self) -> Option<u64> {
        self.applied_generation
    }
}
