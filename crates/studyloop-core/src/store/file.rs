//! JSON-file-backed session store, one file per deck.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::session::SessionConfig;
use crate::store::record::{QueuedReview, StoredSession, StoredStatus, STORAGE_VERSION};
use crate::store::{data_dir, SessionStore};

/// File-backed [`SessionStore`]. Records live under
/// `<data dir>/sessions/<deck_id>.json` and are written synchronously on
/// every mutation, so they survive a crash between a rating and its
/// network submission.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store under the default data directory.
    pub fn open() -> Result<Self, std::io::Error> {
        Ok(Self::with_dir(data_dir()?))
    }

    /// Open the store under a specific directory (for tests).
    pub fn with_dir(base: impl AsRef<Path>) -> Self {
        Self {
            dir: base.as_ref().join("sessions"),
        }
    }

    fn record_path(&self, deck_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(deck_id)))
    }

    fn save(&self, record: &StoredSession) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::WriteFailed {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.record_path(&record.deck_id);
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json).map_err(|source| StoreError::WriteFailed { path, source })
    }

    /// Load, mutate, save. Missing record is a [`StoreError::NoSession`].
    fn mutate(
        &mut self,
        deck_id: &str,
        f: impl FnOnce(&mut StoredSession),
    ) -> Result<(), StoreError> {
        let mut record = self.get(deck_id).ok_or_else(|| StoreError::NoSession {
            deck_id: deck_id.to_string(),
        })?;
        f(&mut record);
        self.save(&record)
    }
}

/// Deck ids become file names; keep only filesystem-safe characters.
fn sanitize_key(deck_id: &str) -> String {
    deck_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

impl SessionStore for FileStore {
    fn create(&mut self, config: &SessionConfig) -> Result<StoredSession, StoreError> {
        let record = StoredSession::new(config);
        self.save(&record)?;
        Ok(record)
    }

    /// A read or parse failure degrades to "no record" rather than
    /// propagating: the session becomes non-recoverable, not broken.
    fn get(&self, deck_id: &str) -> Option<StoredSession> {
        let path = self.record_path(deck_id);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("failed to read session record {}: {e}", path.display());
                return None;
            }
        };
        let record: StoredSession = match serde_json::from_str(&json) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("corrupt session record {}: {e}", path.display());
                return None;
            }
        };
        if record.version != STORAGE_VERSION {
            log::warn!(
                "session record {} has unsupported version {}, ignoring",
                path.display(),
                record.version
            );
            return None;
        }
        Some(record)
    }

    fn add_review(&mut self, deck_id: &str, review: QueuedReview) -> Result<(), StoreError> {
        self.mutate(deck_id, |record| record.apply_review(review))
    }

    fn mark_synced(&mut self, deck_id: &str, card_ids: &[String]) -> Result<(), StoreError> {
        self.mutate(deck_id, |record| record.mark_synced(card_ids))
    }

    fn unsynced_reviews(&self, deck_id: &str) -> Vec<QueuedReview> {
        self.get(deck_id)
            .map(|r| r.unsynced_reviews())
            .unwrap_or_default()
    }

    fn update_status(&mut self, deck_id: &str, status: StoredStatus) -> Result<(), StoreError> {
        self.mutate(deck_id, |record| {
            record.status = status;
            record.touch();
        })
    }

    fn update_current_card(
        &mut self,
        deck_id: &str,
        card_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.mutate(deck_id, |record| {
            record.progress.current_card_id = card_id.map(|s| s.to_string());
            record.progress.current_card_shown_at = card_id.map(|_| chrono::Utc::now());
            record.touch();
        })
    }

    fn clear(&mut self, deck_id: &str) -> Result<(), StoreError> {
        let path = self.record_path(deck_id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::WriteFailed { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Rating;
    use chrono::Utc;
    use tempfile::TempDir;

    fn config(deck_id: &str) -> SessionConfig {
        SessionConfig {
            deck_id: deck_id.into(),
            deck_name: "Test Deck".into(),
            max_cards: 10,
            tag_filter: None,
            prefetch_previews: false,
        }
    }

    fn review(card_id: &str) -> QueuedReview {
        QueuedReview {
            card_id: card_id.into(),
            rating: Rating::Easy,
            duration_ms: 900,
            timestamp: Utc::now(),
            synced: false,
        }
    }

    #[test]
    fn record_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let session_id = {
            let mut store = FileStore::with_dir(tmp.path());
            let record = store.create(&config("d1")).unwrap();
            store.add_review("d1", review("c1")).unwrap();
            record.session_id
        };

        let store = FileStore::with_dir(tmp.path());
        let record = store.get("d1").unwrap();
        assert_eq!(record.session_id, session_id);
        assert_eq!(record.review_queue.len(), 1);
        assert_eq!(record.stats.reviewed(), 1);
    }

    #[test]
    fn corrupt_record_degrades_to_none() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::with_dir(tmp.path());
        store.create(&config("d1")).unwrap();
        std::fs::write(store.record_path("d1"), "{not json").unwrap();
        assert!(store.get("d1").is_none());
        assert!(!store.has_active_session("d1"));
    }

    #[test]
    fn unknown_version_degrades_to_none() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::with_dir(tmp.path());
        store.create(&config("d1")).unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.record_path("d1")).unwrap())
                .unwrap();
        value["version"] = serde_json::json!(99);
        std::fs::write(store.record_path("d1"), value.to_string()).unwrap();
        assert!(store.get("d1").is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::with_dir(tmp.path());
        store.create(&config("d1")).unwrap();
        store.clear("d1").unwrap();
        store.clear("d1").unwrap();
        assert!(store.get("d1").is_none());
    }

    #[test]
    fn deck_ids_are_sanitized() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::with_dir(tmp.path());
        store.create(&config("deck/with spaces")).unwrap();
        assert!(store.get("deck/with spaces").is_some());
        assert_eq!(sanitize_key("a/b c.d"), "a-b-c-d");
    }

    #[test]
    fn mark_synced_persists() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::with_dir(tmp.path());
        store.create(&config("d1")).unwrap();
        store.add_review("d1", review("c1")).unwrap();
        store.add_review("d1", review("c2")).unwrap();
        store.mark_synced("d1", &["c1".to_string()]).unwrap();

        let reopened = FileStore::with_dir(tmp.path());
        let ids: Vec<_> = reopened
            .unsynced_reviews("d1")
            .into_iter()
            .map(|r| r.card_id)
            .collect();
        assert_eq!(ids, vec!["c2"]);
    }
}
