//! Wire types for the remote review API.

use serde::{Deserialize, Serialize};

/// Due/new card counts for a deck, used for pre-session estimation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueCounts {
    /// Cards whose schedule marks them ready for review now.
    pub due: u32,
    /// Cards never previously reviewed.
    #[serde(rename = "new")]
    pub new_cards: u32,
    /// Total cards available under the current filter.
    pub total: u32,
}

/// The next card to review, as served by the remote API.
///
/// Front and back are opaque to the engine; rendering is the UI's concern.
/// The server serves due cards ahead of new cards -- the client does not
/// re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToReview {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether this card has never been reviewed before.
    #[serde(default)]
    pub is_new: bool,
}

/// Body of a review submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewSubmission {
    /// Rating bucket, 1-4.
    pub rating: u8,
    /// Measured think time in milliseconds.
    pub duration_ms: u64,
}

/// Human-readable next-interval previews per rating bucket.
///
/// Produced by the remote scheduler; the engine treats the strings as
/// opaque display hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPreviews {
    pub again: String,
    pub hard: String,
    pub good: String,
    pub easy: String,
}

/// Review API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_counts_deserializes_new_field() {
        let counts: DueCounts =
            serde_json::from_str(r#"{"due": 12, "new": 3, "total": 40}"#).unwrap();
        assert_eq!(counts.due, 12);
        assert_eq!(counts.new_cards, 3);
        assert_eq!(counts.total, 40);
    }

    #[test]
    fn card_defaults() {
        let card: CardToReview =
            serde_json::from_str(r#"{"id": "c1", "front": "Q", "back": "A"}"#).unwrap();
        assert!(card.tags.is_empty());
        assert!(!card.is_new);
    }
}
