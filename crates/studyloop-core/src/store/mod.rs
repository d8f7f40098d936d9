//! Durable review store: per-deck session records that survive restarts.
//!
//! The store is the write-ahead side of the at-least-once delivery model:
//! every review is recorded here before the corresponding network call is
//! attempted.

mod file;
mod memory;
mod record;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{
    QueuedReview, SessionProgress, StoredSession, StoredStatus, STORAGE_VERSION,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::session::SessionConfig;

/// Returns `~/.config/studyloop[-dev]/` based on STUDYLOOP_ENV.
///
/// Set STUDYLOOP_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYLOOP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyloop-dev")
    } else {
        base_dir.join("studyloop")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// What a recovery check found for a deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryInfo {
    pub recoverable: bool,
    pub session: Option<StoredSession>,
    pub unsynced_count: usize,
    /// Human-readable last-updated time, e.g. "12 minutes ago".
    pub last_updated: Option<String>,
}

impl RecoveryInfo {
    fn none() -> Self {
        Self {
            recoverable: false,
            session: None,
            unsynced_count: 0,
            last_updated: None,
        }
    }
}

/// Key-value persistence facade for session records, keyed by deck id.
///
/// Mutations are synchronous; callers rely on a write completing before
/// the corresponding network call is attempted. Failures of the backing
/// medium surface as [`StoreError`] -- the engine logs them and degrades
/// rather than crashing.
pub trait SessionStore {
    /// Write a fresh record for the config's deck, overwriting any prior
    /// record. Callers wanting overwrite-avoidance check
    /// [`SessionStore::has_active_session`] first.
    fn create(&mut self, config: &SessionConfig) -> Result<StoredSession, StoreError>;

    /// The record for a deck, if one exists and is readable.
    fn get(&self, deck_id: &str) -> Option<StoredSession>;

    /// Append a review (write-ahead) and update the record's denormalized
    /// statistics and progress counters in the same step.
    fn add_review(&mut self, deck_id: &str, review: QueuedReview) -> Result<(), StoreError>;

    /// Flip `synced` for matching queue entries. Idempotent.
    fn mark_synced(&mut self, deck_id: &str, card_ids: &[String]) -> Result<(), StoreError>;

    /// All unsynced entries in insertion order, for replay.
    fn unsynced_reviews(&self, deck_id: &str) -> Vec<QueuedReview>;

    /// Update the status tag, refreshing the last-updated timestamp.
    fn update_status(&mut self, deck_id: &str, status: StoredStatus) -> Result<(), StoreError>;

    /// Update the progress cursor's current card, refreshing the
    /// last-updated timestamp.
    fn update_current_card(
        &mut self,
        deck_id: &str,
        card_id: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Delete the record entirely.
    fn clear(&mut self, deck_id: &str) -> Result<(), StoreError>;

    /// True iff a record exists, was started within the last 24 hours, and
    /// either is still `active`/`paused` or holds unsynced reviews.
    fn has_active_session(&self, deck_id: &str) -> bool {
        self.get(deck_id)
            .map(|record| record.is_recoverable(Utc::now()))
            .unwrap_or(false)
    }

    /// Recovery check: not recoverable when no record exists or the record
    /// is finished with nothing left to sync.
    fn recovery_info(&self, deck_id: &str) -> RecoveryInfo {
        let Some(record) = self.get(deck_id) else {
            return RecoveryInfo::none();
        };
        let recoverable = record.is_recoverable(Utc::now());
        RecoveryInfo {
            recoverable,
            unsynced_count: record.unsynced_count(),
            last_updated: Some(humanize_since(record.updated_at, Utc::now())),
            session: Some(record),
        }
    }
}

/// "just now" / "5 minutes ago" / "3 hours ago" / date.
fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed < chrono::Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < chrono::Duration::hours(1) {
        let minutes = elapsed.num_minutes();
        format!("{minutes} minute{} ago", if minutes == 1 { "" } else { "s" })
    } else if elapsed < chrono::Duration::hours(24) {
        let hours = elapsed.num_hours();
        format!("{hours} hour{} ago", if hours == 1 { "" } else { "s" })
    } else {
        then.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_buckets() {
        let now = Utc::now();
        assert_eq!(humanize_since(now - chrono::Duration::seconds(20), now), "just now");
        assert_eq!(
            humanize_since(now - chrono::Duration::minutes(1), now),
            "1 minute ago"
        );
        assert_eq!(
            humanize_since(now - chrono::Duration::minutes(12), now),
            "12 minutes ago"
        );
        assert_eq!(
            humanize_since(now - chrono::Duration::hours(3), now),
            "3 hours ago"
        );
        let old = now - chrono::Duration::days(2);
        assert!(humanize_since(old, now).contains("UTC"));
    }
}
