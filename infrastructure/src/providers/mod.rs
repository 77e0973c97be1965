//! Provider adapters

pub mod chat_completions;

pub use chat_completions::{ChatCompletionsClient, ProviderSettings};
