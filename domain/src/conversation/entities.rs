//! Conversation domain entities

use crate::conversation::value_objects::ConversationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form configuration keys attached to a conversation.
///
/// Merged shallowly on update; the `special_instructions` key (when a
/// string) is folded into future synergy system instructions.
pub type Settings = serde_json::Map<String, serde_json::Value>;

/// Role of a message in a conversation
///
/// `AssistantInternal` marks deliberation text that is never shown to the
/// end user; the transcript transformer rewrites it to `Assistant` before
/// any provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    System,
    User,
    Assistant,
    AssistantInternal,
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Display name of the model that produced this message; present only
    /// for assistant and deliberation entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, speaker: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            speaker,
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content, None)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, None)
    }

    pub fn assistant(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, Some(speaker.into()))
    }

    /// A deliberation entry, internal to the synergy loop
    pub fn deliberation(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::AssistantInternal, content, Some(speaker.into()))
    }
}

/// A generated-asset record attached to a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: String,
    pub prompt: String,
    pub url: String,
}

impl MediaAsset {
    pub fn new(prompt: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            url: url.into(),
        }
    }
}

/// A conversation between the user and the synergy pair (Aggregate Root)
///
/// Messages are append-only; nothing truncates or reorders them. Timestamps
/// are assigned at append time and clamped so they never decrease within a
/// conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    name: String,
    #[serde(default)]
    settings: Settings,
    messages: Vec<Message>,
    #[serde(default)]
    media: Vec<MediaAsset>,
}

impl Conversation {
    /// Create a conversation seeded with its system prompt
    pub fn new(id: ConversationId, system_prompt: impl Into<String>) -> Self {
        let name = format!("Project-{}", id.short());
        let mut conversation = Self {
            id,
            name,
            settings: Settings::new(),
            messages: Vec::new(),
            media: Vec::new(),
        };
        conversation.append(Message::system(system_prompt));
        conversation
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn media(&self) -> &[MediaAsset] {
        &self.media
    }

    /// Append a message, clamping its timestamp so the sequence stays
    /// monotonically non-decreasing even if the wall clock stepped back.
    pub fn append(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last()
            && message.timestamp < last.timestamp
        {
            message.timestamp = last.timestamp;
        }
        self.messages.push(message);
    }

    /// Shallow-merge new settings over the existing ones, returning the
    /// merged view.
    pub fn merge_settings(&mut self, partial: Settings) -> &Settings {
        for (key, value) in partial {
            self.settings.insert(key, value);
        }
        &self.settings
    }

    pub fn add_media(&mut self, asset: MediaAsset) {
        self.media.push(asset);
    }
}
