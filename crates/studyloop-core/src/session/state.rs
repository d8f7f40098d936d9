//! Session lifecycle states, configuration and running statistics.

use serde::{Deserialize, Serialize};

/// Session lifecycle status.
///
/// `Idle` is initial. `Complete` and `Abandoned` are terminal for the
/// current run; both return to `Idle` through `reset_session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Configuring,
    Loading,
    Studying,
    Paused,
    Complete,
    Abandoned,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Configuring => "configuring",
            SessionStatus::Loading => "loading",
            SessionStatus::Studying => "studying",
            SessionStatus::Paused => "paused",
            SessionStatus::Complete => "complete",
            SessionStatus::Abandoned => "abandoned",
        };
        f.write_str(s)
    }
}

/// A review rating, the four buckets of the remote scheduler.
///
/// Serialized as its numeric value (1-4) to match the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Good and Easy count toward session accuracy.
    pub fn is_correct(&self) -> bool {
        matches!(self, Rating::Good | Rating::Easy)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        match rating {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(format!("rating must be 1-4, got {other}")),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        };
        f.write_str(s)
    }
}

/// Session configuration, immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub deck_id: String,
    pub deck_name: String,
    /// Maximum cards to review this session.
    pub max_cards: u32,
    /// Optional tag filter forwarded to the review API.
    #[serde(default)]
    pub tag_filter: Option<Vec<String>>,
    /// Whether to prefetch interval previews when a card is flipped.
    #[serde(default)]
    pub prefetch_previews: bool,
}

/// Running aggregate of rating counts and review time.
///
/// Mutated additively, never decremented. Derivable from the review queue
/// but kept denormalized for O(1) summary reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
    pub total_duration_ms: u64,
}

impl SessionStats {
    pub fn record(&mut self, rating: Rating, duration_ms: u64) {
        match rating {
            Rating::Again => self.again += 1,
            Rating::Hard => self.hard += 1,
            Rating::Good => self.good += 1,
            Rating::Easy => self.easy += 1,
        }
        self.total_duration_ms += duration_ms;
    }

    pub fn reviewed(&self) -> u32 {
        self.again + self.hard + self.good + self.easy
    }

    pub fn correct(&self) -> u32 {
        self.good + self.easy
    }

    pub fn summary(&self) -> SessionSummary {
        let reviewed = self.reviewed();
        let accuracy_pct = if reviewed == 0 {
            0
        } else {
            (self.correct() as f64 / reviewed as f64 * 100.0).round() as u32
        };
        SessionSummary {
            cards_reviewed: reviewed,
            total_duration_ms: self.total_duration_ms,
            again: self.again,
            hard: self.hard,
            good: self.good,
            easy: self.easy,
            accuracy_pct,
        }
    }
}

/// End-of-session summary derived from [`SessionStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub cards_reviewed: u32,
    pub total_duration_ms: u64,
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
    /// `(good + easy) / cards_reviewed * 100`, rounded; 0 when nothing reviewed.
    pub accuracy_pct: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_roundtrip() {
        for rating in Rating::ALL {
            let n: u8 = rating.into();
            assert_eq!(Rating::try_from(n).unwrap(), rating);
        }
        assert!(Rating::try_from(0).is_err());
        assert!(Rating::try_from(5).is_err());
    }

    #[test]
    fn rating_serializes_as_number() {
        let json = serde_json::to_string(&Rating::Good).unwrap();
        assert_eq!(json, "3");
        let back: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(back, Rating::Easy);
    }

    #[test]
    fn accuracy_example() {
        let mut stats = SessionStats::default();
        stats.record(Rating::Again, 1000);
        stats.record(Rating::Hard, 1000);
        for _ in 0..5 {
            stats.record(Rating::Good, 1000);
        }
        for _ in 0..3 {
            stats.record(Rating::Easy, 1000);
        }
        let summary = stats.summary();
        assert_eq!(summary.cards_reviewed, 10);
        assert_eq!(summary.accuracy_pct, 80);
        assert_eq!(summary.total_duration_ms, 10_000);
    }

    #[test]
    fn accuracy_zero_when_nothing_reviewed() {
        let summary = SessionStats::default().summary();
        assert_eq!(summary.cards_reviewed, 0);
        assert_eq!(summary.accuracy_pct, 0);
    }
}
