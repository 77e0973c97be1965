//! Provider-facing transcript transformation.
//!
//! Providers know nothing about deliberation entries: every
//! `assistant-internal` message must reach them re-tagged as a plain
//! `assistant` turn, so both providers see the conversation history a normal
//! assistant would have produced. Pure domain logic, no I/O.

use crate::conversation::entities::{Message, Role};
use serde::{Deserialize, Serialize};

/// The role vocabulary a chat-completion provider accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One transcript entry as sent to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Map the stored message sequence to the provider role vocabulary.
///
/// Total function: every entry maps, order and content are preserved, and no
/// entry is dropped or added. `AssistantInternal` becomes `Assistant`;
/// speakers and timestamps are not part of the provider view.
pub fn prepare_for_provider(messages: &[Message]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|m| ChatMessage {
            role: match m.role {
                Role::System => ChatRole::System,
                Role::User => ChatRole::User,
                Role::Assistant | Role::AssistantInternal => ChatRole::Assistant,
            },
            content: m.content.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_messages() -> Vec<Message> {
        vec![
            Message::system("seed"),
            Message::user("let's start"),
            Message::deliberation("Grok (primary)", "note one"),
            Message::deliberation("ChatGPT (gpt-3.5-turbo)", "note two"),
            Message::assistant("Grok (primary)", "final answer"),
        ]
    }

    #[test]
    fn test_length_and_order_preserved() {
        let messages = sample_messages();
        let transcript = prepare_for_provider(&messages);

        assert_eq!(transcript.len(), messages.len());
        for (original, transformed) in messages.iter().zip(&transcript) {
            assert_eq!(original.content, transformed.content);
        }
    }

    #[test]
    fn test_internal_entries_become_assistant() {
        let transcript = prepare_for_provider(&sample_messages());

        assert_eq!(transcript[2].role, ChatRole::Assistant);
        assert_eq!(transcript[3].role, ChatRole::Assistant);
        assert_eq!(transcript[2].content, "note one");
    }

    #[test]
    fn test_other_roles_untouched() {
        let transcript = prepare_for_provider(&sample_messages());

        assert_eq!(transcript[0].role, ChatRole::System);
        assert_eq!(transcript[1].role, ChatRole::User);
        assert_eq!(transcript[4].role, ChatRole::Assistant);
    }

    #[test]
    fn test_empty_transcript() {
        assert!(prepare_for_provider(&[]).is_empty());
    }

    #[test]
    fn test_chat_role_wire_names() {
        assert_eq!(ChatRole::System.as_str(), "system");
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }
}
