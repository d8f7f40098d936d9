//! Remote review API: wire types and the reqwest-backed client.

mod client;
mod types;

pub use client::{ReviewApi, ReviewClient};
pub use types::{ApiError, CardToReview, DueCounts, IntervalPreviews, ReviewSubmission};
