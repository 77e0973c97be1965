//! Conversation store port
//!
//! Durable-on-write persistence for conversations: every mutating call is
//! flushed before it returns, and appends for one conversation id are
//! serialized so the transcript order is never interleaved.

use async_trait::async_trait;
use tandem_domain::{
    Conversation, ConversationId, ConversationSummary, Idea, MediaAsset, Role, Settings,
};
use thiserror::Error;

/// Errors surfaced by store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversation {0} not found")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Persistent, append-only conversation storage
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation seeded with the phase-based system prompt for
    /// the idea, and persist it. The provider display names are embedded in
    /// the seed prompt.
    async fn create(
        &self,
        idea: &Idea,
        primary_name: &str,
        secondary_name: &str,
    ) -> Result<Conversation, StoreError>;

    /// Fetch the full conversation
    async fn get(&self, id: &ConversationId) -> Result<Conversation, StoreError>;

    /// Append one message; fails with `NotFound` for an unknown id
    async fn append_message(
        &self,
        id: &ConversationId,
        role: Role,
        content: &str,
        speaker: Option<&str>,
    ) -> Result<(), StoreError>;

    /// List all conversations as `{id, name}` summaries, in stable order
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, StoreError>;

    /// Remove a conversation entirely; `Ok(false)` if the id was unknown
    async fn delete(&self, id: &ConversationId) -> Result<bool, StoreError>;

    /// Shallow-merge settings and return the merged view
    async fn update_settings(
        &self,
        id: &ConversationId,
        partial: Settings,
    ) -> Result<Settings, StoreError>;

    /// Record a generated media asset (owned by the media collaborator)
    async fn add_media(
        &self,
        id: &ConversationId,
        prompt: &str,
        url: &str,
    ) -> Result<MediaAsset, StoreError>;
}
