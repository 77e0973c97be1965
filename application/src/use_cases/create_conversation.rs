//! Create Conversation use case
//!
//! Creates a system-prompt-seeded conversation for an idea and asks the
//! primary for a short greeting. The greeting is best-effort: a provider
//! failure leaves a fixed fallback message instead of failing the creation.

use crate::ports::conversation_store::{ConversationStore, StoreError};
use crate::ports::model_client::ModelClient;
use std::sync::Arc;
use tandem_domain::{Conversation, Idea, Role, SynergyPrompt, prepare_for_provider};
use thiserror::Error;
use tracing::warn;

/// Assistant message appended when the greeting call fails
pub const GREETING_FALLBACK: &str = "(greeting failed)";

/// Errors that can occur while creating a conversation
#[derive(Error, Debug)]
pub enum CreateConversationError {
    #[error("Storage error: {0}")]
    Store(String),
}

impl From<StoreError> for CreateConversationError {
    fn from(err: StoreError) -> Self {
        CreateConversationError::Store(err.to_string())
    }
}

/// Use case for creating a synergy conversation from an idea
pub struct CreateConversationUseCase<S: ConversationStore> {
    store: Arc<S>,
    primary: Arc<dyn ModelClient>,
    secondary_name: String,
}

impl<S: ConversationStore> CreateConversationUseCase<S> {
    pub fn new(store: Arc<S>, primary: Arc<dyn ModelClient>, secondary_name: impl Into<String>) -> Self {
        Self {
            store,
            primary,
            secondary_name: secondary_name.into(),
        }
    }

    pub async fn execute(&self, idea: Idea) -> Result<Conversation, CreateConversationError> {
        let primary_name = self.primary.display_name();
        let conversation = self
            .store
            .create(&idea, primary_name, &self.secondary_name)
            .await?;
        let id = conversation.id().clone();

        let instruction = SynergyPrompt::greeting(primary_name, &self.secondary_name, &idea);
        let transcript = prepare_for_provider(conversation.messages());
        let greeting = match self.primary.complete(&instruction, &transcript).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Greeting call failed: {}", e);
                GREETING_FALLBACK.to_string()
            }
        };
        self.store
            .append_message(&id, Role::Assistant, &greeting, Some(primary_name))
            .await?;

        Ok(self.store.get(&id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::fakes::{InMemoryStore, Reply, ScriptedClient};

    const PRIMARY: &str = "Grok (primary)";
    const SECONDARY: &str = "ChatGPT (gpt-3.5-turbo)";

    #[tokio::test]
    async fn creation_seeds_system_prompt_and_greeting() {
        let store = Arc::new(InMemoryStore::new());
        let primary = Arc::new(ScriptedClient::new(
            PRIMARY,
            vec![Reply::Text("Hello! Great idea, let's build it.")],
        ));
        let uc = CreateConversationUseCase::new(store.clone(), primary.clone(), SECONDARY);

        let conversation = uc.execute(Idea::new("recipe planner")).await.unwrap();

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("recipe planner"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].speaker.as_deref(), Some(PRIMARY));

        // The greeting instruction names both parties
        let instructions = primary.instructions();
        assert!(instructions[0].contains(SECONDARY));
    }

    #[tokio::test]
    async fn greeting_failure_falls_back_without_failing_creation() {
        let store = Arc::new(InMemoryStore::new());
        let primary = Arc::new(ScriptedClient::new(PRIMARY, vec![Reply::Fail("auth expired")]));
        let uc = CreateConversationUseCase::new(store.clone(), primary, SECONDARY);

        let conversation = uc.execute(Idea::new("todo app")).await.unwrap();

        let last = conversation.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, GREETING_FALLBACK);
    }
}
