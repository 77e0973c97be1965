//! Model client port
//!
//! Defines the interface for talking to one chat-completion provider.

use async_trait::async_trait;
use tandem_domain::ChatMessage;
use thiserror::Error;

/// Errors a model client call can surface
#[derive(Error, Debug)]
pub enum ModelClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// One external chat-completion provider
///
/// The transcript handed to `complete` is always the transcript-transformer
/// output; deliberation roles never reach a provider. Calls are not retried
/// here; a failure propagates to the caller.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Display name used to tag messages this provider produces
    fn display_name(&self) -> &str;

    /// Request a single text completion for the instruction and transcript
    async fn complete(
        &self,
        system_instruction: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, ModelClientError>;
}
