//! Run Synergy use case
//!
//! Drives the bounded alternating-turn loop between the primary and
//! secondary providers for one inbound user message. The primary always
//! owns the user-facing finalization, so the conversation keeps a single
//! consistent voice no matter which party detects readiness to finish.

use crate::ports::conversation_store::{ConversationStore, StoreError};
use crate::ports::model_client::{ModelClient, ModelClientError};
use crate::ports::progress::{NoProgress, ProgressSink};
use crate::use_cases::shared::check_cancelled;
use std::sync::Arc;
use tandem_domain::{
    ConversationId, FORCED_FINALIZE_NOTICE, FORCED_FINALIZE_TEXT, MAX_SYNERGY_ROUNDS, Role,
    SentinelRule, SynergyPrompt, SynergyRun, TerminationDecision, TerminationRule,
    apply_special_instructions, prepare_for_provider,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can terminate a synergy run
#[derive(Error, Debug)]
pub enum RunSynergyError {
    #[error("Conversation {0} not found")]
    NotFound(ConversationId),

    #[error("User message must not be empty")]
    InvalidInput,

    /// Cancellation observed at a loop boundary. Deliberation messages
    /// already appended stay in the store; nothing is rolled back.
    #[error("Synergy run aborted")]
    Aborted,

    #[error(transparent)]
    Provider(#[from] ModelClientError),

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<StoreError> for RunSynergyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RunSynergyError::NotFound(id),
            StoreError::Storage(message) => RunSynergyError::Store(message),
        }
    }
}

/// Input for the RunSynergy use case
#[derive(Debug, Clone)]
pub struct RunSynergyInput {
    pub conversation_id: ConversationId,
    pub user_message: String,
}

impl RunSynergyInput {
    pub fn new(conversation_id: ConversationId, user_message: impl Into<String>) -> Self {
        Self {
            conversation_id,
            user_message: user_message.into(),
        }
    }
}

/// Use case for running one synergy loop over a conversation
pub struct RunSynergyUseCase<S: ConversationStore> {
    store: Arc<S>,
    primary: Arc<dyn ModelClient>,
    secondary: Arc<dyn ModelClient>,
    termination: Box<dyn TerminationRule>,
}

impl<S: ConversationStore> RunSynergyUseCase<S> {
    pub fn new(store: Arc<S>, primary: Arc<dyn ModelClient>, secondary: Arc<dyn ModelClient>) -> Self {
        Self {
            store,
            primary,
            secondary,
            termination: Box::new(SentinelRule),
        }
    }

    /// Replace the default sentinel-based termination rule
    pub fn with_termination_rule(mut self, rule: Box<dyn TerminationRule>) -> Self {
        self.termination = rule;
        self
    }

    /// Execute with no progress reporting and no cancellation
    pub async fn execute(&self, input: RunSynergyInput) -> Result<SynergyRun, RunSynergyError> {
        self.execute_with_progress(input, &NoProgress, None).await
    }

    /// Execute the synergy loop.
    ///
    /// Cancellation is cooperative and coarse-grained: the token is polled
    /// at iteration boundaries only, so an in-flight provider call always
    /// completes and its result is appended before the abort is honored.
    pub async fn execute_with_progress(
        &self,
        input: RunSynergyInput,
        progress: &dyn ProgressSink,
        cancellation: Option<CancellationToken>,
    ) -> Result<SynergyRun, RunSynergyError> {
        let user_message = input.user_message.trim();
        if user_message.is_empty() {
            return Err(RunSynergyError::InvalidInput);
        }

        let id = &input.conversation_id;
        // Unknown ids surface before any mutation
        self.store.get(id).await?;
        self.store
            .append_message(id, Role::User, user_message, None)
            .await?;

        let primary_name = self.primary.display_name();
        let secondary_name = self.secondary.display_name();
        info!("Starting synergy run for conversation {}", id);

        let mut iteration = 1usize;
        loop {
            check_cancelled(&cancellation)?;
            progress.on_step(&format!(
                "Pass #{iteration} - {primary_name} -> {secondary_name} -> check final"
            ));

            let conversation = self.store.get(id).await?;
            let instruction = apply_special_instructions(
                &SynergyPrompt::primary_pass(primary_name),
                conversation.settings(),
            );
            let note = self
                .primary
                .complete(&instruction, &prepare_for_provider(conversation.messages()))
                .await?;
            self.store
                .append_message(id, Role::AssistantInternal, &note, Some(primary_name))
                .await?;
            debug!(iteration, "primary pass appended");

            if self.termination.classify(&note) == TerminationDecision::Finalize {
                info!(iteration, "primary signaled completion");
                let final_text = self
                    .finalize(id, &SynergyPrompt::primary_finalize(primary_name))
                    .await?;
                return Ok(SynergyRun::finalized(final_text, iteration));
            }

            if iteration > MAX_SYNERGY_ROUNDS {
                warn!(iteration, "iteration cap hit, forcibly finalizing");
                self.store
                    .append_message(id, Role::Assistant, FORCED_FINALIZE_NOTICE, Some(primary_name))
                    .await?;
                return Ok(SynergyRun::forced(FORCED_FINALIZE_TEXT, iteration));
            }

            check_cancelled(&cancellation)?;

            let conversation = self.store.get(id).await?;
            let instruction = apply_special_instructions(
                &SynergyPrompt::secondary_pass(secondary_name, &note),
                conversation.settings(),
            );
            let reply = self
                .secondary
                .complete(&instruction, &prepare_for_provider(conversation.messages()))
                .await?;
            self.store
                .append_message(id, Role::AssistantInternal, &reply, Some(secondary_name))
                .await?;
            debug!(iteration, "secondary pass appended");

            if self.termination.classify(&reply) == TerminationDecision::Finalize {
                info!(iteration, "secondary signaled completion, primary finalizes");
                let final_text = self
                    .finalize(id, &SynergyPrompt::handoff_finalize(secondary_name))
                    .await?;
                return Ok(SynergyRun::finalized(final_text, iteration));
            }

            iteration += 1;
        }
    }

    /// Issue the finalization call to the primary and append the single
    /// user-visible reply of this run.
    async fn finalize(
        &self,
        id: &ConversationId,
        instruction: &str,
    ) -> Result<String, RunSynergyError> {
        let conversation = self.store.get(id).await?;
        let instruction = apply_special_instructions(instruction, conversation.settings());
        let final_text = self
            .primary
            .complete(&instruction, &prepare_for_provider(conversation.messages()))
            .await?;
        self.store
            .append_message(
                id,
                Role::Assistant,
                &final_text,
                Some(self.primary.display_name()),
            )
            .await?;
        Ok(final_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::fakes::{InMemoryStore, Reply, ScriptedClient};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tandem_domain::{ChatMessage, Idea, Settings, SynergyOutcome};

    const PRIMARY: &str = "Grok (primary)";
    const SECONDARY: &str = "ChatGPT (gpt-3.5-turbo)";

    struct VecSink(Mutex<Vec<String>>);

    impl VecSink {
        fn new() -> Self {
            Self(Mutex::new(Vec::new()))
        }

        fn notes(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ProgressSink for VecSink {
        fn on_step(&self, note: &str) {
            self.0.lock().unwrap().push(note.to_string());
        }
    }

    async fn seeded(store: &InMemoryStore) -> ConversationId {
        store
            .create(&Idea::new("todo app"), PRIMARY, SECONDARY)
            .await
            .unwrap()
            .id()
            .clone()
    }

    fn use_case(
        store: Arc<InMemoryStore>,
        primary: Arc<ScriptedClient>,
        secondary: Arc<ScriptedClient>,
    ) -> RunSynergyUseCase<InMemoryStore> {
        RunSynergyUseCase::new(store, primary, secondary)
    }

    #[tokio::test]
    async fn primary_sentinel_finalizes_without_secondary_call() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let primary = Arc::new(ScriptedClient::new(
            PRIMARY,
            vec![Reply::Text("All set. ###FINAL###"), Reply::Text("Here is the plan.")],
        ));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = use_case(store.clone(), primary.clone(), secondary.clone());

        let run = uc
            .execute(RunSynergyInput::new(id.clone(), "let's start"))
            .await
            .unwrap();

        assert_eq!(run.final_text, "Here is the plan.");
        assert_eq!(run.outcome, SynergyOutcome::Finalized);
        assert_eq!(run.iterations, 1);
        // Exactly one synergy pass plus one finalization call, no secondary
        assert_eq!(primary.call_count(), 2);
        assert_eq!(secondary.call_count(), 0);

        let convo = store.get(&id).await.unwrap();
        let roles: Vec<Role> = convo.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::AssistantInternal, Role::Assistant]
        );
        let last = convo.messages().last().unwrap();
        assert_eq!(last.speaker.as_deref(), Some(PRIMARY));
        assert_eq!(last.content, "Here is the plan.");
    }

    #[tokio::test]
    async fn secondary_signal_still_finalized_by_primary() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let primary = Arc::new(ScriptedClient::new(
            PRIMARY,
            vec![Reply::Text("short note for the other model"), Reply::Text("Final voice.")],
        ));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![Reply::Text("finalizing")]));
        let uc = use_case(store.clone(), primary.clone(), secondary.clone());

        let run = uc
            .execute(RunSynergyInput::new(id.clone(), "go"))
            .await
            .unwrap();

        assert_eq!(run.final_text, "Final voice.");
        assert_eq!(primary.call_count(), 2);
        assert_eq!(secondary.call_count(), 1);

        // The handoff instruction names the secondary but the reply is
        // appended under the primary's name
        let instructions = primary.instructions();
        assert!(instructions[1].starts_with(SECONDARY));
        let convo = store.get(&id).await.unwrap();
        let last = convo.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.speaker.as_deref(), Some(PRIMARY));
    }

    #[tokio::test]
    async fn never_finalizing_run_is_forced_after_cap() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        // Empty scripts: both clients answer with a non-finalizing note
        let primary = Arc::new(ScriptedClient::new(PRIMARY, vec![]));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = use_case(store.clone(), primary.clone(), secondary.clone());

        let run = uc
            .execute(RunSynergyInput::new(id.clone(), "never ends"))
            .await
            .unwrap();

        assert_eq!(run.outcome, SynergyOutcome::ForcedFinalized);
        assert_eq!(run.final_text, FORCED_FINALIZE_TEXT);
        // 25 full rounds plus the partial pass that trips the cap
        assert_eq!(primary.call_count(), MAX_SYNERGY_ROUNDS + 1);
        assert_eq!(secondary.call_count(), MAX_SYNERGY_ROUNDS);
        assert!(primary.call_count() + secondary.call_count() <= 51);

        let convo = store.get(&id).await.unwrap();
        let assistants: Vec<&str> = convo
            .messages()
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(assistants, vec![FORCED_FINALIZE_NOTICE]);
    }

    #[tokio::test]
    async fn cancellation_before_any_call_appends_only_user_message() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let primary = Arc::new(ScriptedClient::new(PRIMARY, vec![]));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = use_case(store.clone(), primary.clone(), secondary.clone());

        let token = CancellationToken::new();
        token.cancel();

        let err = uc
            .execute_with_progress(
                RunSynergyInput::new(id.clone(), "please stop"),
                &NoProgress,
                Some(token),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RunSynergyError::Aborted));
        assert_eq!(primary.call_count(), 0);
        assert_eq!(secondary.call_count(), 0);
        let roles: Vec<Role> = store
            .get(&id)
            .await
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
    }

    /// Client that cancels the token as a side effect of answering, so the
    /// abort lands on the boundary between the primary and secondary passes.
    struct CancellingClient {
        inner: ScriptedClient,
        token: CancellationToken,
    }

    #[async_trait]
    impl ModelClient for CancellingClient {
        fn display_name(&self) -> &str {
            self.inner.display_name()
        }

        async fn complete(
            &self,
            system_instruction: &str,
            transcript: &[ChatMessage],
        ) -> Result<String, ModelClientError> {
            let result = self.inner.complete(system_instruction, transcript).await;
            self.token.cancel();
            result
        }
    }

    #[tokio::test]
    async fn mid_run_cancellation_keeps_partial_deliberation_trail() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let token = CancellationToken::new();
        let primary = Arc::new(CancellingClient {
            inner: ScriptedClient::new(PRIMARY, vec![Reply::Text("half-done note")]),
            token: token.clone(),
        });
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = RunSynergyUseCase::new(store.clone(), primary, secondary.clone());

        let err = uc
            .execute_with_progress(
                RunSynergyInput::new(id.clone(), "go"),
                &NoProgress,
                Some(token),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RunSynergyError::Aborted));
        // The in-flight primary call completed and its note was kept
        let convo = store.get(&id).await.unwrap();
        let roles: Vec<Role> = convo.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::AssistantInternal]);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_propagates_and_keeps_trail() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let primary = Arc::new(ScriptedClient::new(PRIMARY, vec![Reply::Text("a note")]));
        let secondary =
            Arc::new(ScriptedClient::new(SECONDARY, vec![Reply::Fail("rate limit hit")]));
        let uc = use_case(store.clone(), primary.clone(), secondary.clone());

        let err = uc
            .execute(RunSynergyInput::new(id.clone(), "go"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunSynergyError::Provider(_)));
        let roles: Vec<Role> = store
            .get(&id)
            .await
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.role)
            .collect();
        // Primary's deliberation survives the secondary's failure
        assert_eq!(roles, vec![Role::System, Role::User, Role::AssistantInternal]);
    }

    #[tokio::test]
    async fn empty_user_message_is_rejected_before_mutation() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let primary = Arc::new(ScriptedClient::new(PRIMARY, vec![]));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = use_case(store.clone(), primary, secondary);

        let err = uc
            .execute(RunSynergyInput::new(id.clone(), "   \n"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunSynergyError::InvalidInput));
        assert_eq!(store.get(&id).await.unwrap().messages().len(), 1);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let primary = Arc::new(ScriptedClient::new(PRIMARY, vec![]));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = use_case(store, primary, secondary);

        let missing: ConversationId = "no-such-conversation".parse().unwrap();
        let err = uc
            .execute(RunSynergyInput::new(missing, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunSynergyError::NotFound(_)));
    }

    #[tokio::test]
    async fn progress_notes_are_ordered_one_per_iteration() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let primary = Arc::new(ScriptedClient::new(
            PRIMARY,
            vec![
                Reply::Text("round one"),
                Reply::Text("round two"),
                Reply::Text("###FINAL###"),
                Reply::Text("done"),
            ],
        ));
        let secondary = Arc::new(ScriptedClient::new(
            SECONDARY,
            vec![Reply::Text("keep going"), Reply::Text("keep going")],
        ));
        let uc = use_case(store, primary, secondary);

        let sink = VecSink::new();
        uc.execute_with_progress(RunSynergyInput::new(id, "go"), &sink, None)
            .await
            .unwrap();

        let notes = sink.notes();
        assert_eq!(notes.len(), 3);
        for (index, note) in notes.iter().enumerate() {
            assert!(note.starts_with(&format!("Pass #{}", index + 1)));
        }
    }

    #[tokio::test]
    async fn special_instructions_reach_the_pass_prompt() {
        let store = Arc::new(InMemoryStore::new());
        let id = seeded(&store).await;
        let mut settings = Settings::new();
        settings.insert(
            "special_instructions".into(),
            serde_json::json!("answer in haiku"),
        );
        store.update_settings(&id, settings).await.unwrap();

        let primary = Arc::new(ScriptedClient::new(
            PRIMARY,
            vec![Reply::Text("###FINAL###"), Reply::Text("done")],
        ));
        let secondary = Arc::new(ScriptedClient::new(SECONDARY, vec![]));
        let uc = use_case(store, primary.clone(), secondary);

        uc.execute(RunSynergyInput::new(id, "go")).await.unwrap();

        for instruction in primary.instructions() {
            assert!(instruction.contains("answer in haiku"));
        }
    }

    #[tokio::test]
    async fn end_to_end_transcript_shape() {
        let store = Arc::new(InMemoryStore::new());
        let created = store
            .create(&Idea::new("todo app"), PRIMARY, SECONDARY)
            .await
            .unwrap();

        // Seeded with the system prompt, no assistant reply yet
        assert_eq!(created.messages().len(), 1);
        assert_eq!(created.messages()[0].role, Role::System);
        assert!(created.messages()[0].content.contains("todo app"));

        let primary = Arc::new(ScriptedClient::new(
            PRIMARY,
            vec![
                Reply::Text("phase one thoughts"),
                Reply::Text("finalizing now"),
                Reply::Text("Ship it."),
            ],
        ));
        let secondary =
            Arc::new(ScriptedClient::new(SECONDARY, vec![Reply::Text("agreed, continue")]));
        let uc = use_case(store.clone(), primary, secondary);

        uc.execute(RunSynergyInput::new(created.id().clone(), "let's start"))
            .await
            .unwrap();

        let convo = store.get(created.id()).await.unwrap();
        let roles: Vec<Role> = convo.messages().iter().map(|m| m.role).collect();
        // One user message, some deliberation, exactly one terminal assistant
        assert_eq!(roles[1], Role::User);
        assert_eq!(roles.last(), Some(&Role::Assistant));
        assert_eq!(
            roles.iter().filter(|r| **r == Role::Assistant).count(),
            1
        );
        assert!(roles.iter().filter(|r| **r == Role::AssistantInternal).count() >= 1);
    }
}
