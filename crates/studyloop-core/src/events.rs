use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{CardToReview, IntervalPreviews};
use crate::session::{Rating, SessionStatus, SessionSummary};

/// Every state change in the engine produces an Event.
/// The UI layer renders from these; it never reaches into engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ConfigurationStarted {
        deck_id: String,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: String,
        deck_id: String,
        max_cards: u32,
        at: DateTime<Utc>,
    },
    CardShown {
        card: CardToReview,
        cards_reviewed: u32,
        at: DateTime<Utc>,
    },
    CardFlipped {
        card_id: String,
        /// Present when preview prefetch was enabled and succeeded.
        previews: Option<IntervalPreviews>,
        at: DateTime<Utc>,
    },
    CardRated {
        card_id: String,
        rating: Rating,
        duration_ms: u64,
        /// Whether the remote submission succeeded immediately. A `false`
        /// here is invisible to the user; the review stays queued.
        synced: bool,
        at: DateTime<Utc>,
    },
    SessionPaused {
        at: DateTime<Utc>,
    },
    SessionResumed {
        at: DateTime<Utc>,
    },
    SessionCompleted {
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
    SessionAbandoned {
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SessionStatus,
        deck_id: Option<String>,
        cards_reviewed: u32,
        max_cards: u32,
        card: Option<CardToReview>,
        revealed: bool,
        at: DateTime<Utc>,
    },
}
