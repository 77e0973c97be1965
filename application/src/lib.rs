//! Application layer for tandem
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; adapters for the ports live in the infrastructure and
//! presentation layers.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_store::{ConversationStore, StoreError},
    model_client::{ModelClient, ModelClientError},
    progress::{NoProgress, ProgressSink},
    scaffold_writer::{ScaffoldWriteError, ScaffoldWriter},
};
pub use use_cases::create_conversation::{CreateConversationError, CreateConversationUseCase};
pub use use_cases::run_synergy::{RunSynergyError, RunSynergyInput, RunSynergyUseCase};
pub use use_cases::scaffold_project::{
    ScaffoldProjectError, ScaffoldProjectOutput, ScaffoldProjectUseCase,
};
