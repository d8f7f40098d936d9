//! The persisted session record and its mutation helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Rating, SessionConfig, SessionStats};

/// On-disk schema version, reserved for future migration.
pub const STORAGE_VERSION: u32 = 1;

fn default_version() -> u32 {
    STORAGE_VERSION
}

/// Persisted session status tag.
///
/// Transitions are monotonic except `Paused` <-> `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredStatus {
    Active,
    Paused,
    Completed,
    Abandoned,
}

/// One durable record per submitted rating.
///
/// Created before any network call (write-ahead); `synced` flips true only
/// after the remote submission succeeds. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedReview {
    pub card_id: String,
    pub rating: Rating,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub synced: bool,
}

/// Progress cursor within a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub cards_studied: u32,
    pub current_card_id: Option<String>,
    pub current_card_shown_at: Option<DateTime<Utc>>,
}

/// The unit persisted in the durable review store, one per deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default = "default_version")]
    pub version: u32,
    pub session_id: String,
    pub deck_id: String,
    pub deck_name: String,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub config: SessionConfig,
    #[serde(default)]
    pub progress: SessionProgress,
    #[serde(default)]
    pub review_queue: Vec<QueuedReview>,
    #[serde(default)]
    pub stats: SessionStats,
    pub status: StoredStatus,
}

impl StoredSession {
    /// A fresh record with empty queue and stats, status `Active`.
    pub fn new(config: &SessionConfig) -> Self {
        let now = Utc::now();
        Self {
            version: STORAGE_VERSION,
            session_id: Uuid::new_v4().to_string(),
            deck_id: config.deck_id.clone(),
            deck_name: config.deck_name.clone(),
            started_at: now,
            updated_at: now,
            config: config.clone(),
            progress: SessionProgress::default(),
            review_queue: Vec::new(),
            stats: SessionStats::default(),
            status: StoredStatus::Active,
        }
    }

    /// Append a review and additively update the denormalized statistics
    /// and progress counters in the same step, so they never diverge.
    pub fn apply_review(&mut self, review: QueuedReview) {
        self.stats.record(review.rating, review.duration_ms);
        self.progress.cards_studied += 1;
        self.review_queue.push(review);
        self.touch();
    }

    /// Flip `synced` for matching queue entries. Idempotent.
    pub fn mark_synced(&mut self, card_ids: &[String]) {
        for review in &mut self.review_queue {
            if card_ids.iter().any(|id| id == &review.card_id) {
                review.synced = true;
            }
        }
        self.touch();
    }

    /// Unsynced entries in insertion order.
    pub fn unsynced_reviews(&self) -> Vec<QueuedReview> {
        self.review_queue
            .iter()
            .filter(|r| !r.synced)
            .cloned()
            .collect()
    }

    pub fn unsynced_count(&self) -> usize {
        self.review_queue.iter().filter(|r| !r.synced).count()
    }

    /// Started within the last 24 hours.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.started_at) < chrono::Duration::hours(24)
    }

    /// The recovery-eligibility predicate: recent, and either still live
    /// or holding unsynced reviews.
    pub fn is_recoverable(&self, now: DateTime<Utc>) -> bool {
        if !self.is_recent(now) {
            return false;
        }
        matches!(self.status, StoredStatus::Active | StoredStatus::Paused)
            || self.unsynced_count() > 0
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            deck_id: "deck-1".into(),
            deck_name: "Deck One".into(),
            max_cards: 20,
            tag_filter: None,
            prefetch_previews: false,
        }
    }

    fn review(card_id: &str) -> QueuedReview {
        QueuedReview {
            card_id: card_id.into(),
            rating: Rating::Good,
            duration_ms: 1500,
            timestamp: Utc::now(),
            synced: false,
        }
    }

    #[test]
    fn apply_review_updates_stats_and_progress_together() {
        let mut record = StoredSession::new(&config());
        record.apply_review(review("c1"));
        record.apply_review(review("c2"));
        assert_eq!(record.review_queue.len(), 2);
        assert_eq!(record.progress.cards_studied, 2);
        assert_eq!(record.stats.reviewed(), 2);
        assert_eq!(record.stats.total_duration_ms, 3000);
    }

    #[test]
    fn record_equality_covers_config() {
        let record = StoredSession::new(&config());
        let mut other = record.clone();
        assert_eq!(record, other);
        other.config.max_cards = 5;
        assert_ne!(record, other);
    }

    #[test]
    fn mark_synced_is_idempotent() {
        let mut record = StoredSession::new(&config());
        record.apply_review(review("c1"));
        record.apply_review(review("c2"));
        record.mark_synced(&["c1".to_string()]);
        let once = record.review_queue.clone();
        record.mark_synced(&["c1".to_string()]);
        assert_eq!(record.review_queue, once);
        assert_eq!(record.unsynced_count(), 1);
        assert_eq!(record.unsynced_reviews()[0].card_id, "c2");
    }

    #[test]
    fn stale_record_is_not_recoverable() {
        let mut record = StoredSession::new(&config());
        record.apply_review(review("c1"));
        record.started_at = Utc::now() - chrono::Duration::hours(25);
        assert!(!record.is_recoverable(Utc::now()));
    }

    #[test]
    fn completed_with_unsynced_is_recoverable() {
        let mut record = StoredSession::new(&config());
        record.apply_review(review("c1"));
        record.status = StoredStatus::Completed;
        assert!(record.is_recoverable(Utc::now()));
    }

    #[test]
    fn version_defaults_on_missing_field() {
        let mut value = serde_json::to_value(StoredSession::new(&config())).unwrap();
        value.as_object_mut().unwrap().remove("version");
        let record: StoredSession = serde_json::from_value(value).unwrap();
        assert_eq!(record.version, STORAGE_VERSION);
    }
}
