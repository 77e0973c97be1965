//! Conversation value objects

use serde::{Deserialize, Serialize};

/// Opaque unique identifier of a conversation (Value Object)
///
/// Assigned once at creation, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix used for default display names
    pub fn short(&self) -> &str {
        let end = self.0.len().min(5);
        &self.0[..end]
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConversationId {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::core::error::DomainError::InvalidConversationId(
                s.to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Lightweight listing entry: id and display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub name: String,
}
