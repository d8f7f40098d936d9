//! HashMap-backed session store for tests and embedding.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::session::SessionConfig;
use crate::store::record::{QueuedReview, StoredSession, StoredStatus};
use crate::store::SessionStore;

/// In-memory [`SessionStore`]. Nothing survives the process; useful for
/// tests and for callers that bring their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, StoredSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built record, e.g. to seed recovery scenarios.
    pub fn seed(&mut self, record: StoredSession) {
        self.records.insert(record.deck_id.clone(), record);
    }

    fn record_mut(&mut self, deck_id: &str) -> Result<&mut StoredSession, StoreError> {
        self.records
            .get_mut(deck_id)
            .ok_or_else(|| StoreError::NoSession {
                deck_id: deck_id.to_string(),
            })
    }
}

impl SessionStore for MemoryStore {
    fn create(&mut self, config: &SessionConfig) -> Result<StoredSession, StoreError> {
        let record = StoredSession::new(config);
        self.records.insert(config.deck_id.clone(), record.clone());
        Ok(record)
    }

    fn get(&self, deck_id: &str) -> Option<StoredSession> {
        self.records.get(deck_id).cloned()
    }

    fn add_review(&mut self, deck_id: &str, review: QueuedReview) -> Result<(), StoreError> {
        self.record_mut(deck_id)?.apply_review(review);
        Ok(())
    }

    fn mark_synced(&mut self, deck_id: &str, card_ids: &[String]) -> Result<(), StoreError> {
        self.record_mut(deck_id)?.mark_synced(card_ids);
        Ok(())
    }

    fn unsynced_reviews(&self, deck_id: &str) -> Vec<QueuedReview> {
        self.records
            .get(deck_id)
            .map(|r| r.unsynced_reviews())
            .unwrap_or_default()
    }

    fn update_status(&mut self, deck_id: &str, status: StoredStatus) -> Result<(), StoreError> {
        let record = self.record_mut(deck_id)?;
        record.status = status;
        record.touch();
        Ok(())
    }

    fn update_current_card(
        &mut self,
        deck_id: &str,
        card_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let record = self.record_mut(deck_id)?;
        record.progress.current_card_id = card_id.map(|s| s.to_string());
        record.progress.current_card_shown_at = card_id.map(|_| chrono::Utc::now());
        record.touch();
        Ok(())
    }

    fn clear(&mut self, deck_id: &str) -> Result<(), StoreError> {
        self.records.remove(deck_id);
        Ok(())
    }
}
