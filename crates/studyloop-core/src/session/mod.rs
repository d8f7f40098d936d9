//! Session lifecycle: state machine, engine, timing, recovery.

mod engine;
pub mod recovery;
mod state;
mod timing;
mod visibility;

pub use engine::SessionEngine;
pub use recovery::SyncOutcome;
pub use state::{Rating, SessionConfig, SessionStats, SessionStatus, SessionSummary};
pub use timing::{ThinkTimer, MAX_THINK_MS};
pub use visibility::{
    visibility_channel, Visibility, VisibilityPublisher, VisibilitySubscription,
};
