//! Termination classification for synergy passes.
//!
//! A provider signals readiness to finalize inside free text; free-text
//! output cannot be forced into a strict grammar, so the default rule is a
//! deliberately permissive substring check. The decision is modeled as an
//! explicit pure classification step so it can be unit-tested independently
//! of live model calls and replaced behind the [`TerminationRule`] trait.

/// The literal marker a provider embeds to signal loop termination
pub const FINAL_SENTINEL: &str = "###FINAL###";

/// Outcome of classifying one deliberation reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationDecision {
    /// Keep alternating passes
    Continue,
    /// The reply signals readiness; issue the finalization call
    Finalize,
}

/// Classifies a raw deliberation reply as continue-or-finalize
pub trait TerminationRule: Send + Sync {
    fn classify(&self, reply: &str) -> TerminationDecision;
}

/// Default rule: the sentinel `###FINAL###` (case-sensitive) or the word
/// "finalizing" (case-insensitive) anywhere in the reply.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentinelRule;

impl TerminationRule for SentinelRule {
    fn classify(&self, reply: &str) -> TerminationDecision {
        if reply.contains(FINAL_SENTINEL) || reply.to_lowercase().contains("finalizing") {
            TerminationDecision::Finalize
        } else {
            TerminationDecision::Continue
        }
    }
}
