//! Recovery of interrupted sessions found in the durable store.
//!
//! No attempt is made to resume mid-card: resuming replays the unsynced
//! reviews so the server folds the prior progress into its statistics,
//! then clears the record for a fresh configuration pass.

use serde::{Deserialize, Serialize};

use crate::api::{ReviewApi, ReviewSubmission};
use crate::error::StoreError;
use crate::store::SessionStore;

/// Result of a pending-review sync pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// True when every pending review reached the server.
    pub success: bool,
    /// How many reviews were submitted and marked synced this pass.
    pub submitted: usize,
    /// Card ids whose submission failed; they stay queued for a later
    /// attempt.
    pub failed: Vec<String>,
}

/// Replay all unsynced reviews for a deck through the API.
///
/// Partial success is allowed: successes are marked synced, failures are
/// collected per card id and remain queued. The record itself is never
/// cleared here.
pub async fn sync_pending<S, A>(store: &mut S, api: &A, deck_id: &str) -> SyncOutcome
where
    S: SessionStore,
    A: ReviewApi,
{
    let pending = store.unsynced_reviews(deck_id);
    if pending.is_empty() {
        return SyncOutcome {
            success: true,
            ..SyncOutcome::default()
        };
    }

    let mut synced_ids = Vec::new();
    let mut failed = Vec::new();
    for review in &pending {
        let submission = ReviewSubmission {
            rating: review.rating.into(),
            duration_ms: review.duration_ms,
        };
        match api.submit_review(&review.card_id, &submission).await {
            Ok(()) => synced_ids.push(review.card_id.clone()),
            Err(e) => {
                log::warn!("failed to sync review for card {}: {e}", review.card_id);
                failed.push(review.card_id.clone());
            }
        }
    }

    let mut success = failed.is_empty();
    if !synced_ids.is_empty() {
        if let Err(e) = store.mark_synced(deck_id, &synced_ids) {
            // The server has the reviews; a re-send on the next pass is
            // absorbed by its idempotent handling.
            log::warn!("failed to mark reviews synced for deck {deck_id}: {e}");
            success = false;
        }
    }
    log::debug!(
        "sync for deck {deck_id}: {} submitted, {} failed",
        synced_ids.len(),
        failed.len()
    );

    SyncOutcome {
        success,
        submitted: synced_ids.len(),
        failed,
    }
}

/// Resume an interrupted session: flush pending reviews, then clear the
/// record only if everything synced. A failed resume leaves the record
/// intact for a future retry.
pub async fn resume<S, A>(
    store: &mut S,
    api: &A,
    deck_id: &str,
) -> Result<SyncOutcome, StoreError>
where
    S: SessionStore,
    A: ReviewApi,
{
    let outcome = sync_pending(store, api, deck_id).await;
    if outcome.success {
        store.clear(deck_id)?;
    }
    Ok(outcome)
}

/// Discard an interrupted session without syncing. Unsynced reviews are
/// permanently lost; this is an explicit user choice.
pub fn discard<S: SessionStore>(store: &mut S, deck_id: &str) -> Result<(), StoreError> {
    store.clear(deck_id)
}
