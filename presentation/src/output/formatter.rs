//! Console formatting for conversations, run results, and scaffolds

use colored::Colorize;
use std::path::PathBuf;
use tandem_domain::{
    Conversation, ConversationSummary, Message, Role, ScaffoldFile, SynergyRun,
    extract_suggested_answers,
};

/// Formats domain objects for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The final reply of a synergy run, with any suggested answers listed
    /// as numbered choices below it.
    pub fn format_final(run: &SynergyRun) -> String {
        let mut out = String::new();
        out.push_str(run.final_text.trim());
        out.push('\n');

        let suggestions = extract_suggested_answers(&run.final_text);
        if !suggestions.is_empty() {
            out.push('\n');
            out.push_str(&format!("{}\n", "Suggested answers:".bold()));
            for (index, suggestion) in suggestions.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", index + 1, suggestion));
            }
        }

        if run.was_forced() {
            out.push('\n');
            out.push_str(&format!(
                "{}\n",
                "(the synergy loop hit its iteration cap)".dimmed()
            ));
        }

        out
    }

    /// Full transcript; deliberation entries only with `show_internal`
    pub fn format_conversation(conversation: &Conversation, show_internal: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {}\n\n",
            conversation.name().bold(),
            format!("({})", conversation.id()).dimmed()
        ));

        for message in conversation.messages() {
            if message.role == Role::AssistantInternal && !show_internal {
                continue;
            }
            out.push_str(&Self::format_message(message));
        }

        if !conversation.media().is_empty() {
            out.push_str(&format!("\n{}\n", "Media:".bold()));
            for asset in conversation.media() {
                out.push_str(&format!("  {} {}\n", asset.url, asset.prompt.dimmed()));
            }
        }

        out
    }

    fn format_message(message: &Message) -> String {
        let speaker = message.speaker.as_deref();
        match message.role {
            Role::System => format!("{}\n\n", "[system prompt]".dimmed()),
            Role::User => format!("{}\n{}\n\n", "you:".green().bold(), message.content),
            Role::Assistant => format!(
                "{}\n{}\n\n",
                format!("{}:", speaker.unwrap_or("assistant")).cyan().bold(),
                message.content
            ),
            Role::AssistantInternal => format!(
                "{}\n{}\n\n",
                format!("{} (deliberation):", speaker.unwrap_or("assistant")).dimmed(),
                message.content.dimmed()
            ),
        }
    }

    pub fn format_summaries(summaries: &[ConversationSummary]) -> String {
        if summaries.is_empty() {
            return "(no conversations yet)\n".to_string();
        }

        let mut out = String::new();
        for summary in summaries {
            out.push_str(&format!("{}  {}\n", summary.id, summary.name.bold()));
        }
        out
    }

    pub fn format_scaffold(files: &[ScaffoldFile], written: &[PathBuf]) -> String {
        let mut out = format!("{}\n", format!("Scaffold generated {} files:", files.len()).bold());
        for path in written {
            out.push_str(&format!("  {}\n", path.display()));
        }
        out
    }
}
