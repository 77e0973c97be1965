//! Scaffold Project use case
//!
//! Asks a provider for a `{"files": [...]}` plan over the transformed
//! transcript and materializes it through the scaffold-writer port. A reply
//! that cannot be parsed surfaces with the raw offending text attached.

use crate::ports::conversation_store::{ConversationStore, StoreError};
use crate::ports::model_client::{ModelClient, ModelClientError};
use crate::ports::scaffold_writer::{ScaffoldWriteError, ScaffoldWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tandem_domain::{
    ConversationId, ScaffoldParseError, ScaffoldPlan, SynergyPrompt, parse_scaffold_response,
    prepare_for_provider,
};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during scaffold generation
#[derive(Error, Debug)]
pub enum ScaffoldProjectError {
    #[error("Conversation {0} not found")]
    NotFound(ConversationId),

    #[error(transparent)]
    Provider(#[from] ModelClientError),

    #[error("Malformed scaffold output: {0}")]
    MalformedOutput(#[from] ScaffoldParseError),

    #[error(transparent)]
    Write(#[from] ScaffoldWriteError),

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<StoreError> for ScaffoldProjectError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ScaffoldProjectError::NotFound(id),
            StoreError::Storage(message) => ScaffoldProjectError::Store(message),
        }
    }
}

/// The parsed plan plus the paths actually written
#[derive(Debug)]
pub struct ScaffoldProjectOutput {
    pub plan: ScaffoldPlan,
    pub written: Vec<PathBuf>,
}

/// Use case for generating and writing a project scaffold
pub struct ScaffoldProjectUseCase<S: ConversationStore, W: ScaffoldWriter> {
    store: Arc<S>,
    client: Arc<dyn ModelClient>,
    writer: Arc<W>,
}

impl<S: ConversationStore, W: ScaffoldWriter> ScaffoldProjectUseCase<S, W> {
    pub fn new(store: Arc<S>, client: Arc<dyn ModelClient>, writer: Arc<W>) -> Self {
        Self {
            store,
            client,
            writer,
        }
    }

    pub async fn execute(
        &self,
        id: &ConversationId,
    ) -> Result<ScaffoldProjectOutput, ScaffoldProjectError> {
        let conversation = self.store.get(id).await?;
        let transcript = prepare_for_provider(conversation.messages());

        let response = self
            .client
            .complete(SynergyPrompt::scaffold_system(), &transcript)
            .await?;
        let plan = parse_scaffold_response(&response)?;
        info!("Scaffold plan parsed: {} files", plan.files.len());

        let written = self.writer.write(id, &plan).await?;
        Ok(ScaffoldProjectOutput { plan, written })
    }
}
