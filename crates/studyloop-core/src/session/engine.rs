//! The session engine: a wall-clock state machine over the durable review
//! store and the remote review API.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Configuring -> Loading -> Studying <-> Paused
//!                           |           |
//!                           v           v
//!                    Complete/Abandoned -> Idle (reset)
//! ```
//!
//! The engine is the single source of truth for the session lifecycle.
//! Operations invoked from a state that does not permit them return
//! [`SessionError::InvalidState`]; operations that hit the network resolve
//! failures into state transitions instead of surfacing them.
//!
//! The write-ahead discipline lives in [`rate_card`](SessionEngine::rate_card):
//! the queued review is persisted before the submission is attempted, so a
//! crash between the two leaves a recoverable record.

use chrono::Utc;
use uuid::Uuid;

use crate::api::{CardToReview, ReviewApi, ReviewSubmission};
use crate::error::SessionError;
use crate::events::Event;
use crate::session::recovery::{self, SyncOutcome};
use crate::session::state::{Rating, SessionConfig, SessionStats, SessionStatus, SessionSummary};
use crate::session::timing::{now_ms, ThinkTimer};
use crate::session::visibility::Visibility;
use crate::store::{QueuedReview, RecoveryInfo, SessionStore, StoredStatus};

/// Orchestrates one review loop against a store and an API.
///
/// Driven from a single logical thread; the API calls are the only
/// suspension points.
pub struct SessionEngine<S, A> {
    store: S,
    api: A,
    status: SessionStatus,
    config: Option<SessionConfig>,
    session_id: Option<String>,
    card: Option<CardToReview>,
    revealed: bool,
    cards_reviewed: u32,
    stats: SessionStats,
    timer: ThinkTimer,
}

impl<S: SessionStore, A: ReviewApi> SessionEngine<S, A> {
    pub fn new(store: S, api: A) -> Self {
        Self {
            store,
            api,
            status: SessionStatus::Idle,
            config: None,
            session_id: None,
            card: None,
            revealed: false,
            cards_reviewed: 0,
            stats: SessionStats::default(),
            timer: ThinkTimer::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_card(&self) -> Option<&CardToReview> {
        self.card.as_ref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn cards_reviewed(&self) -> u32 {
        self.cards_reviewed
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Summary of the current run: per-rating counts, total duration,
    /// rounded accuracy (0 when nothing was reviewed).
    pub fn session_summary(&self) -> SessionSummary {
        self.stats.summary()
    }

    /// Build a full state snapshot event for rendering.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            deck_id: self.config.as_ref().map(|c| c.deck_id.clone()),
            cards_reviewed: self.cards_reviewed,
            max_cards: self.config.as_ref().map(|c| c.max_cards).unwrap_or(0),
            card: self.card.clone(),
            revealed: self.revealed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter the configuration pass for a deck.
    pub fn start_configuration(&mut self, deck_id: &str) -> Result<Event, SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(self.invalid("start configuration"));
        }
        self.status = SessionStatus::Configuring;
        Ok(Event::ConfigurationStarted {
            deck_id: deck_id.to_string(),
            at: Utc::now(),
        })
    }

    /// Start a session: persist a fresh record, then fetch the first card.
    ///
    /// A store failure degrades to a non-durable session; a card fetch
    /// failure resolves into `Abandoned`.
    pub async fn start_session(
        &mut self,
        config: SessionConfig,
    ) -> Result<Vec<Event>, SessionError> {
        if !matches!(
            self.status,
            SessionStatus::Idle | SessionStatus::Configuring
        ) {
            return Err(self.invalid("start session"));
        }

        let session_id = match self.store.create(&config) {
            Ok(record) => record.session_id,
            Err(e) => {
                log::warn!("session record not persisted for deck {}: {e}", config.deck_id);
                Uuid::new_v4().to_string()
            }
        };

        let mut events = vec![Event::SessionStarted {
            session_id: session_id.clone(),
            deck_id: config.deck_id.clone(),
            max_cards: config.max_cards,
            at: Utc::now(),
        }];

        self.session_id = Some(session_id);
        self.config = Some(config);
        self.card = None;
        self.revealed = false;
        self.cards_reviewed = 0;
        self.stats = SessionStats::default();
        self.timer.clear();
        self.status = SessionStatus::Loading;

        self.advance(&mut events).await;
        Ok(events)
    }

    /// Reveal the answer side. Prefetches interval previews when the
    /// configuration asks for them; a prefetch failure only means the
    /// event carries no previews.
    pub async fn flip_card(&mut self) -> Result<Event, SessionError> {
        if self.status != SessionStatus::Studying {
            return Err(self.invalid("flip card"));
        }
        let card_id = self
            .card
            .as_ref()
            .map(|c| c.id.clone())
            .ok_or(SessionError::NoSession)?;
        self.revealed = true;

        let prefetch = self
            .config
            .as_ref()
            .map(|c| c.prefetch_previews)
            .unwrap_or(false);
        let previews = if prefetch {
            match self.api.interval_previews(&card_id).await {
                Ok(previews) => Some(previews),
                Err(e) => {
                    log::debug!("interval preview prefetch failed for {card_id}: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Event::CardFlipped {
            card_id,
            previews,
            at: Utc::now(),
        })
    }

    /// Rate the current card and advance.
    ///
    /// Order matters: the review is written to the durable store *before*
    /// the network submission is attempted, and in-memory statistics are
    /// updated optimistically whether or not the submission succeeds.
    pub async fn rate_card(&mut self, rating: Rating) -> Result<Vec<Event>, SessionError> {
        if self.status != SessionStatus::Studying {
            return Err(self.invalid("rate card"));
        }
        let card = self.card.take().ok_or(SessionError::NoSession)?;
        let deck_id = self.deck_id().ok_or(SessionError::NoSession)?;

        let duration_ms = self.timer.elapsed_ms(now_ms());
        let review = QueuedReview {
            card_id: card.id.clone(),
            rating,
            duration_ms,
            timestamp: Utc::now(),
            synced: false,
        };

        // Write-ahead: durable record first, network second.
        if let Err(e) = self.store.add_review(&deck_id, review) {
            log::warn!("review for card {} not persisted: {e}", card.id);
        }
        self.stats.record(rating, duration_ms);
        self.cards_reviewed += 1;
        self.revealed = false;

        let submission = ReviewSubmission {
            rating: rating.into(),
            duration_ms,
        };
        let synced = match self.api.submit_review(&card.id, &submission).await {
            Ok(()) => {
                if let Err(e) = self.store.mark_synced(&deck_id, &[card.id.clone()]) {
                    log::warn!("review for card {} not marked synced: {e}", card.id);
                }
                true
            }
            Err(e) => {
                // Stays queued; the recovery flow retries on the next visit.
                log::debug!("review submission failed for card {}: {e}", card.id);
                false
            }
        };

        let mut events = vec![Event::CardRated {
            card_id: card.id,
            rating,
            duration_ms,
            synced,
            at: Utc::now(),
        }];

        let max_cards = self.config.as_ref().map(|c| c.max_cards).unwrap_or(0);
        if self.cards_reviewed >= max_cards {
            self.complete(&mut events);
        } else {
            self.status = SessionStatus::Loading;
            self.advance(&mut events).await;
        }
        Ok(events)
    }

    pub fn pause_session(&mut self) -> Option<Event> {
        match self.status {
            SessionStatus::Studying => {
                self.timer.pause(now_ms());
                self.persist_status(StoredStatus::Paused);
                self.status = SessionStatus::Paused;
                Some(Event::SessionPaused { at: Utc::now() })
            }
            _ => None,
        }
    }

    pub fn resume_session(&mut self) -> Option<Event> {
        match self.status {
            SessionStatus::Paused => {
                self.timer.resume(now_ms());
                self.persist_status(StoredStatus::Active);
                self.status = SessionStatus::Studying;
                Some(Event::SessionResumed { at: Utc::now() })
            }
            _ => None,
        }
    }

    /// Visibility changes converge on the same pause/resume paths as the
    /// explicit operations.
    pub fn handle_visibility(&mut self, visibility: Visibility) -> Option<Event> {
        match visibility {
            Visibility::Hidden => self.pause_session(),
            Visibility::Visible => self.resume_session(),
        }
    }

    /// User-initiated early exit. The persisted status is set to
    /// `abandoned` before the in-memory transition, so an abrupt close
    /// right after still reflects abandonment.
    pub fn exit_session(&mut self) -> Option<Event> {
        match self.status {
            SessionStatus::Idle | SessionStatus::Complete | SessionStatus::Abandoned => None,
            _ => {
                self.persist_status(StoredStatus::Abandoned);
                self.status = SessionStatus::Abandoned;
                self.timer.clear();
                Some(Event::SessionAbandoned { at: Utc::now() })
            }
        }
    }

    /// Return to `Idle` from a terminal state, clearing the stored record
    /// for the deck.
    pub fn reset_session(&mut self) -> Result<Event, SessionError> {
        if !matches!(
            self.status,
            SessionStatus::Complete | SessionStatus::Abandoned
        ) {
            return Err(self.invalid("reset session"));
        }
        if let Some(deck_id) = self.deck_id() {
            if let Err(e) = self.store.clear(&deck_id) {
                log::warn!("session record for deck {deck_id} not cleared: {e}");
            }
        }
        self.status = SessionStatus::Idle;
        self.config = None;
        self.session_id = None;
        self.card = None;
        self.revealed = false;
        self.cards_reviewed = 0;
        self.stats = SessionStats::default();
        self.timer.clear();
        Ok(Event::SessionReset { at: Utc::now() })
    }

    // ── Recovery ─────────────────────────────────────────────────────

    /// Inspect the durable store for an unfinished session on this deck.
    pub fn check_recoverable_session(&self, deck_id: &str) -> RecoveryInfo {
        self.store.recovery_info(deck_id)
    }

    /// Replay unsynced reviews for a deck. The record is left in place.
    pub async fn sync_pending_reviews(&mut self, deck_id: &str) -> SyncOutcome {
        recovery::sync_pending(&mut self.store, &self.api, deck_id).await
    }

    /// Resume a recovered session: flush pending reviews and clear the
    /// record once everything synced.
    pub async fn resume_recovered_session(&mut self, deck_id: &str) -> SyncOutcome {
        match recovery::resume(&mut self.store, &self.api, deck_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("failed to clear recovered session for deck {deck_id}: {e}");
                SyncOutcome::default()
            }
        }
    }

    /// Discard a recovered session, dropping its unsynced reviews.
    pub fn discard_recovered_session(&mut self, deck_id: &str) {
        if let Err(e) = recovery::discard(&mut self.store, deck_id) {
            log::warn!("failed to discard session for deck {deck_id}: {e}");
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            status: self.status,
        }
    }

    fn deck_id(&self) -> Option<String> {
        self.config.as_ref().map(|c| c.deck_id.clone())
    }

    fn persist_status(&mut self, status: StoredStatus) {
        if let Some(deck_id) = self.deck_id() {
            if let Err(e) = self.store.update_status(&deck_id, status) {
                log::warn!("session status for deck {deck_id} not persisted: {e}");
            }
        }
    }

    /// Fetch the next card and transition accordingly: a card moves to
    /// `Studying`, an empty queue completes the session, a hard fetch
    /// failure abandons it.
    async fn advance(&mut self, events: &mut Vec<Event>) {
        let Some(config) = self.config.clone() else {
            return;
        };
        // Guards the zero-max configuration: the cap holds before any
        // card is ever fetched.
        if self.cards_reviewed >= config.max_cards {
            self.complete(events);
            return;
        }
        match self
            .api
            .next_card(&config.deck_id, config.tag_filter.as_deref())
            .await
        {
            Ok(Some(card)) => {
                if let Err(e) = self.store.update_current_card(&config.deck_id, Some(&card.id))
                {
                    log::warn!("current card for deck {} not persisted: {e}", config.deck_id);
                }
                self.timer.card_shown(now_ms());
                self.revealed = false;
                self.card = Some(card.clone());
                self.status = SessionStatus::Studying;
                events.push(Event::CardShown {
                    card,
                    cards_reviewed: self.cards_reviewed,
                    at: Utc::now(),
                });
            }
            Ok(None) => self.complete(events),
            Err(e) => {
                log::warn!("next-card fetch failed for deck {}: {e}", config.deck_id);
                // Persist abandonment so a later recovery check does not
                // treat the session as still active.
                self.persist_status(StoredStatus::Abandoned);
                self.status = SessionStatus::Abandoned;
                self.timer.clear();
                events.push(Event::SessionAbandoned { at: Utc::now() });
            }
        }
    }

    fn complete(&mut self, events: &mut Vec<Event>) {
        self.persist_status(StoredStatus::Completed);
        self.status = SessionStatus::Complete;
        self.card = None;
        self.timer.clear();
        events.push(Event::SessionCompleted {
            summary: self.stats.summary(),
            at: Utc::now(),
        });
    }
}
