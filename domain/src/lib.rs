//! Domain layer for tandem
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Synergy
//!
//! Synergy is the central concept in tandem: two model providers alternate
//! short deliberation passes over a shared conversation until one of them
//! signals readiness to finalize.
//!
//! - **Primary / Secondary**: the primary provider always produces the
//!   user-facing final message, even when the secondary detected readiness
//! - **Deliberation**: internal-only transcript entries never shown to the
//!   end user and never sent to a provider under their internal role

pub mod conversation;
pub mod core;
pub mod scaffold;
pub mod synergy;

// Re-export commonly used types
pub use conversation::{
    entities::{Conversation, MediaAsset, Message, Role, Settings},
    transcript::{ChatMessage, ChatRole, prepare_for_provider},
    value_objects::{ConversationId, ConversationSummary},
};
pub use core::{error::DomainError, idea::Idea};
pub use scaffold::{ScaffoldFile, ScaffoldParseError, ScaffoldPlan, parse_scaffold_response};
pub use synergy::{
    FORCED_FINALIZE_NOTICE, FORCED_FINALIZE_TEXT, MAX_SYNERGY_ROUNDS,
    entities::{SynergyOutcome, SynergyRun},
    prompts::{SynergyPrompt, apply_special_instructions},
    suggestions::extract_suggested_answers,
    termination::{FINAL_SENTINEL, SentinelRule, TerminationDecision, TerminationRule},
};
