//! Idea value object

use serde::{Deserialize, Serialize};

/// The project idea that seeds a conversation (Value Object)
///
/// Every conversation starts from an idea; it is embedded verbatim into the
/// phase-based system prompt when the conversation is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    content: String,
}

impl Idea {
    /// Create a new idea
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Idea cannot be empty");
        Self { content }
    }

    /// Try to create a new idea, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the idea content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Idea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Idea {
    fn from(s: &str) -> Self {
        Idea::new(s)
    }
}

impl From<String> for Idea {
    fn from(s: String) -> Self {
        Idea::new(s)
    }
}
