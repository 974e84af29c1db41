//! Per-move thinking time handed to the engine with `go movetime`

use std::fmt;
use std::time::Duration;

/// Search time budget in milliseconds, always within
/// [`SearchBudget::MIN_MS`]..=[`SearchBudget::MAX_MS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchBudget(u64);

impl SearchBudget {
    pub const MIN_MS: u64 = 1_000;
    pub const MAX_MS: u64 = 10_000;
    /// Amount added or removed by one press of the time keys
    pub const STEP_MS: u64 = 1_000;

    /// Build a budget, clamping out-of-range values into the allowed window
    pub fn clamped(millis: u64) -> Self {
        SearchBudget(millis.clamp(Self::MIN_MS, Self::MAX_MS))
    }

    pub fn millis(self) -> u64 {
        self.0
    }

    /// Whole seconds, as shown to the player
    pub fn seconds(self) -> u64 {
        self.0 / 1_000
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// One step longer, saturating at the maximum
    pub fn increased(self) -> Self {
        Self::clamped(self.0.saturating_add(Self::STEP_MS))
    }

    /// One step shorter, saturating at the minimum
    pub fn decreased(self) -> Self {
        Self::clamped(self.0.saturating_sub(Self::STEP_MS))
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget(Self::MIN_MS)
    }
}

impl fmt::Display for SearchBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}
