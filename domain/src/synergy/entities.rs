//! Synergy run outcomes

use serde::{Deserialize, Serialize};

/// How a synergy run reached its terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynergyOutcome {
    /// A provider signaled completion and the primary produced the final
    /// user-facing message
    Finalized,
    /// The iteration cap was hit and the fixed fallback was appended
    ForcedFinalized,
}

/// Result of one complete synergy run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyRun {
    /// The single user-visible reply appended by this run
    pub final_text: String,
    pub outcome: SynergyOutcome,
    /// Number of loop iterations performed (the last one may be partial)
    pub iterations: usize,
}

impl SynergyRun {
    pub fn finalized(final_text: impl Into<String>, iterations: usize) -> Self {
        Self {
            final_text: final_text.into(),
            outcome: SynergyOutcome::Finalized,
            iterations,
        }
    }

    pub fn forced(final_text: impl Into<String>, iterations: usize) -> Self {
        Self {
            final_text: final_text.into(),
            outcome: SynergyOutcome::ForcedFinalized,
            iterations,
        }
    }

    pub fn was_forced(&self) -> bool {
        self.outcome == SynergyOutcome::ForcedFinalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_helpers() {
        assert!(!SynergyRun::finalized("done", 3).was_forced());
        assert!(SynergyRun::forced("(max synergy loops reached)", 26).was_forced());
    }
}
