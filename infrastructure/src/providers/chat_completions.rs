//! Chat-completions HTTP provider adapter.
//!
//! Both providers speak the OpenAI-style `/chat/completions` protocol, so
//! one adapter serves either endpoint; only the base URL, model, and key
//! differ. Transport and HTTP-status failures map onto the port's error
//! taxonomy; a call is never retried here.

use async_trait::async_trait;
use serde::Deserialize;
use tandem_application::ports::model_client::{ModelClient, ModelClientError};
use tandem_domain::ChatMessage;
use tracing::debug;

/// Connection settings for one provider endpoint
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Display name used to tag this provider's messages
    pub name: String,
    pub model: String,
    /// API base, e.g. `https://api.x.ai/v1`
    pub base_url: String,
    pub api_key: String,
    pub temperature: f64,
}

/// OpenAI-compatible chat-completions client
pub struct ChatCompletionsClient {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn build_request_body(
        &self,
        system_instruction: &str,
        transcript: &[ChatMessage],
    ) -> serde_json::Value {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(serde_json::json!({
            "role": "system",
            "content": system_instruction,
        }));
        for message in transcript {
            messages.push(serde_json::json!({
                "role": message.role.as_str(),
                "content": message.content,
            }));
        }

        serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
            "temperature": self.settings.temperature,
        })
    }
}

#[async_trait]
impl ModelClient for ChatCompletionsClient {
    fn display_name(&self) -> &str {
        &self.settings.name
    }

    async fn complete(
        &self,
        system_instruction: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, ModelClientError> {
        let body = self.build_request_body(system_instruction, transcript);
        debug!(
            model = %self.settings.model,
            messages = transcript.len() + 1,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelClientError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ModelClientError::Connection(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(classify_status(status, &text));
        }

        let parsed: ChatCompletionsResponse = serde_json::from_str(&text)
            .map_err(|e| ModelClientError::MalformedResponse(format!("{e}: {}", snippet(&text))))?;

        Ok(extract_text(parsed))
    }
}

/// Map a non-success HTTP status onto the port error taxonomy
fn classify_status(status: u16, body: &str) -> ModelClientError {
    match status {
        401 | 403 => ModelClientError::Auth(format!("HTTP {status}: {}", snippet(body))),
        429 => ModelClientError::RateLimited(format!("HTTP {status}: {}", snippet(body))),
        _ => ModelClientError::RequestFailed(format!("HTTP {status}: {}", snippet(body))),
    }
}

/// First completion text, empty when the provider sent none
fn extract_text(response: ChatCompletionsResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default()
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(index, _)| index)
        .unwrap_or(body.len());
    body[..end].trim_end()
}

/// Chat-completions wire format (the subset we read)
#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
