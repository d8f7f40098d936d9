//! # Studyloop Core Library
//!
//! Core business logic for Studyloop, a spaced-repetition study client.
//! The library drives one review loop -- fetch the next due card, show it,
//! time the think interval, submit a rating, fetch the next card -- and
//! keeps that loop correct across suspension, network failure, and restart.
//!
//! ## Architecture
//!
//! - **Session Engine**: a wall-clock state machine owning the session
//!   lifecycle; callers feed it intents and render from the events it emits
//! - **Durable Review Store**: per-deck JSON records written ahead of every
//!   network submission, so no review is lost to a crash or a dead network
//! - **Review API**: the remote scheduler; the scheduling algorithm itself
//!   is opaque to this crate
//! - **Recovery**: on revisit, an unfinished record is offered for
//!   resume (replay unsynced reviews) or discard
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: orchestrator over store and API
//! - [`SessionStore`]: persistence facade ([`MemoryStore`], [`FileStore`])
//! - [`ReviewApi`]: remote API trait ([`ReviewClient`] over HTTP)
//! - [`ThinkTimer`]: per-card think time, paused intervals excluded

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod store;

pub use api::{ApiError, CardToReview, DueCounts, IntervalPreviews, ReviewApi, ReviewClient};
pub use config::Config;
pub use error::{ConfigError, CoreError, SessionError, StoreError};
pub use events::Event;
pub use session::{
    Rating, SessionConfig, SessionEngine, SessionStats, SessionStatus, SessionSummary,
    SyncOutcome, ThinkTimer, Visibility,
};
pub use store::{
    FileStore, MemoryStore, QueuedReview, RecoveryInfo, SessionStore, StoredSession, StoredStatus,
};
