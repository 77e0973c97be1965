//! Prompt templates for the synergy flow

use crate::conversation::entities::Settings;
use crate::core::idea::Idea;
use crate::synergy::termination::FINAL_SENTINEL;

/// Templates for the instructions sent at each stage of a synergy run
pub struct SynergyPrompt;

impl SynergyPrompt {
    /// System prompt seeded into a new conversation, embedding the idea
    pub fn seed_system(primary_name: &str, secondary_name: &str, idea: &Idea) -> String {
        format!(
            r#"You are {primary} (primary) and {secondary} (secondary), collaborating on app creation in multiple phases:
Phase 1: Requirements & Vision
Phase 2: Tech Stack & Architecture
Phase 3: Implementation & Code
Phase 4: Testing & Deployment

If user is idle, keep moving forward through each phase automatically.
When all phases are done or no more content, produce "{sentinel}".
Keep responses short. Whenever you ask a question, provide "SUGGESTED_ANSWERS:" with bullet items.

Idea: "{idea}""#,
            primary = primary_name,
            secondary = secondary_name,
            sentinel = FINAL_SENTINEL,
            idea = idea.content(),
        )
    }

    /// Synergy-pass instruction for the primary provider
    pub fn primary_pass(primary_name: &str) -> String {
        format!(
            r#"You are {primary}, synergy pass.
Keep it short, minimal fluff.
If you're ready to finalize user-facing, add "{sentinel}" or "finalizing now."
Otherwise produce a short note for the other model."#,
            primary = primary_name,
            sentinel = FINAL_SENTINEL,
        )
    }

    /// Finalization instruction after the primary signaled completion
    pub fn primary_finalize(primary_name: &str) -> String {
        format!(
            r#"You are {primary}, produce the final user-facing message.
Keep it short.
If there's a question, provide "SUGGESTED_ANSWERS:" with bullet items.
Don't display "{sentinel}"."#,
            primary = primary_name,
            sentinel = FINAL_SENTINEL,
        )
    }

    /// Synergy-pass instruction for the secondary provider, quoting the
    /// primary's last deliberation note verbatim
    pub fn secondary_pass(secondary_name: &str, primary_note: &str) -> String {
        format!(
            r#"You are {secondary}, synergy pass.
Short note responding to the primary's last message: "{note}".
If you want to finalize, add "{sentinel}"."#,
            secondary = secondary_name,
            note = primary_note,
            sentinel = FINAL_SENTINEL,
        )
    }

    /// Finalization instruction when the secondary triggered termination:
    /// the primary still owns the user-facing voice
    pub fn handoff_finalize(secondary_name: &str) -> String {
        format!(
            r#"{secondary} signaled final, but you are the primary.
Produce the final user-facing message.
Keep it short, bullet-based if you want."#,
            secondary = secondary_name,
        )
    }

    /// Greeting requested right after a conversation is created
    pub fn greeting(primary_name: &str, secondary_name: &str, idea: &Idea) -> String {
        format!(
            r#"You are {primary}, greet the user about idea: "{idea}" in 2 lines.
Mention {secondary} is also here, but you are final."#,
            primary = primary_name,
            idea = idea.content(),
            secondary = secondary_name,
        )
    }

    /// Instruction for scaffold generation: strict JSON, no commentary
    pub fn scaffold_system() -> &'static str {
        r#"Output ONLY valid JSON in the format:
{
  "files": [
    { "path": "folder/file.ext", "content": "..." }
  ]
}
No extra commentary.
Keep it short.
No code fences.
We want actual file paths and contents."#
    }
}

/// Fold a conversation's `special_instructions` setting (when a string) into
/// a system instruction for future passes.
pub fn apply_special_instructions(instruction: &str, settings: &Settings) -> String {
    match settings
        .get("special_instructions")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(special) => format!("{instruction}\n\nSpecial instructions: {special}"),
        None => instruction.to_string(),
    }
}
