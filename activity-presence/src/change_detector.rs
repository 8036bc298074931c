//! Activity change detection.
//!
//! The detector remembers the identity of the last emitted activity. A new
//! record is produced only when the `process|||title` identity differs from
//! the stored one; the start time is reset at that moment and nowhere else.

use crate::classifier::ActivityClassifier;
use crate::types::{ActivityIdentity, PresenceRecord, RawActivity};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Tracks the current activity and suppresses redundant updates
pub struct ChangeDetector {
    classifier: ActivityClassifier,
    /// Identity of the last emitted record
    last_identity: Option<ActivityIdentity>,
    /// Last emitted record
    current: Option<PresenceRecord>,
    /// Number of changes observed so far
    changes: u64,
}

impl ChangeDetector {
    pub fn new(classifier: ActivityClassifier) -> Self {
        Self {
            classifier,
            last_identity: None,
            current: None,
            changes: 0,
        }
    }

    /// Observe one poll result.
    ///
    /// Returns the freshly classified record if the activity changed, `None`
    /// if it is the same activity as last time.
    pub fn observe(&mut self, raw: &RawActivity) -> Option<PresenceRecord> {
        self.observe_at(raw, Utc::now())
    }

    /// Same as [`observe`](Self::observe) with an explicit clock
    pub fn observe_at(&mut self, raw: &RawActivity, now: DateTime<Utc>) -> Option<PresenceRecord> {
        let identity = raw.identity();

        if self.last_identity.as_ref() == Some(&identity) {
            trace!("Activity unchanged: {}", identity);
            return None;
        }

        debug!(
            "Activity changed: {} -> {}",
            self.last_identity
                .as_ref()
                .map(ActivityIdentity::as_str)
                .unwrap_or("<none>"),
            identity
        );

        let record = self.classifier.classify_at(raw, now);
        self.last_identity = Some(identity);
        self.current = Some(record.clone());
        self.changes += 1;

        Some(record)
    }

    /// Record currently on display, if any
    pub fn current(&self) -> Option<&PresenceRecord> {
        self.current.as_ref()
    }

    pub fn last_identity(&self) -> Option<&ActivityIdentity> {
        self.last_identity.as_ref()
    }

    pub fn change_count(&self) -> u64 {
        self.changes
    }

    pub fn classifier(&self) -> &ActivityClassifier {
        &self.classifier
    }

    /// Forget the last activity so the next observation is reported as a change
    pub fn reset(&mut self) {
        self.last_identity = None;
        self.current = None;
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(ActivityClassifier::default())
    }
}
