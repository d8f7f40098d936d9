//! Think-time tracking for the card currently on screen.
//!
//! The timer operates on wall-clock epoch milliseconds -- no internal
//! thread. The caller stamps every transition with `now`, which keeps the
//! arithmetic deterministic under test.

/// Upper bound on a single card's measured think time (one hour).
///
/// Guards against clock anomalies and multi-day-idle tabs.
pub const MAX_THINK_MS: u64 = 3_600_000;

/// Tracks elapsed think time for one card, excluding paused intervals.
///
/// Pause accumulation is local to the current card: it resets when the
/// next card is shown.
#[derive(Debug, Clone, Default)]
pub struct ThinkTimer {
    /// When the current card was first shown (epoch ms).
    shown_at_ms: Option<u64>,
    /// Total paused time accumulated while this card was on screen.
    paused_ms: u64,
    /// Start of the currently open pause interval, if any.
    hidden_since_ms: Option<u64>,
}

impl ThinkTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the moment a card becomes current. Resets pause accumulation.
    pub fn card_shown(&mut self, now_ms: u64) {
        self.shown_at_ms = Some(now_ms);
        self.paused_ms = 0;
        self.hidden_since_ms = None;
    }

    /// Open a pause interval. A second call while already paused is a no-op.
    pub fn pause(&mut self, now_ms: u64) {
        if self.hidden_since_ms.is_none() {
            self.hidden_since_ms = Some(now_ms);
        }
    }

    /// Close the open pause interval, folding it into the accumulator.
    pub fn resume(&mut self, now_ms: u64) {
        if let Some(hidden) = self.hidden_since_ms.take() {
            self.paused_ms += now_ms.saturating_sub(hidden);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.hidden_since_ms.is_some()
    }

    /// Elapsed think time: `now - shown_at - paused`, clamped to
    /// `[0, MAX_THINK_MS]`. An open pause interval at call time is also
    /// subtracted.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let Some(shown) = self.shown_at_ms else {
            return 0;
        };
        let mut paused = self.paused_ms;
        if let Some(hidden) = self.hidden_since_ms {
            paused += now_ms.saturating_sub(hidden);
        }
        now_ms
            .saturating_sub(shown)
            .saturating_sub(paused)
            .min(MAX_THINK_MS)
    }

    /// Clear the stamp entirely (no card on screen).
    pub fn clear(&mut self) {
        self.shown_at_ms = None;
        self.paused_ms = 0;
        self.hidden_since_ms = None;
    }
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
