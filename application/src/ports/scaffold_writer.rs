//! Scaffold writer port
//!
//! Materializes a parsed scaffold plan onto disk (or wherever the adapter
//! decides project files live).

use async_trait::async_trait;
use std::path::PathBuf;
use tandem_domain::{ConversationId, ScaffoldPlan};
use thiserror::Error;

/// Errors surfaced while writing scaffold files
#[derive(Error, Debug)]
pub enum ScaffoldWriteError {
    #[error("Unsafe scaffold path rejected: {0}")]
    UnsafePath(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Writes a scaffold plan under the project directory for a conversation
#[async_trait]
pub trait ScaffoldWriter: Send + Sync {
    /// Write all files in the plan; returns the paths written, in plan order
    async fn write(
        &self,
        id: &ConversationId,
        plan: &ScaffoldPlan,
    ) -> Result<Vec<PathBuf>, ScaffoldWriteError>;
}
