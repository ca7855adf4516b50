//! Chat-completion capability
//!
//! The dispatcher talks to providers through the `ChatCompleter` trait so
//! tests can substitute scripted backends. The production implementation
//! speaks the OpenAI-compatible wire protocol over reqwest.

use crate::config::ProviderConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why a single completion attempt failed
///
/// These are routine, per-attempt outcomes: the dispatcher renders them as
/// diagnostic text and moves on to the next provider.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Interface to a chat-based completion backend
///
/// Implementations must be thread-safe; the dispatcher shares one completer
/// across concurrent `ask` calls. The provider is passed per call: endpoint
/// and credential bindings are scoped to a single attempt and never cached
/// across providers.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Send the prompt as a single user-role message and return the
    /// generated text.
    async fn complete(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

/// OpenAI-compatible HTTP completer
///
/// Builds a fresh client per attempt so nothing from one provider's binding
/// (endpoint, credential) survives into the next attempt.
pub struct HttpChatCompleter {
    timeout: Duration,
}

impl HttpChatCompleter {
    /// Create a completer with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn completions_url(provider: &ProviderConfig) -> String {
        format!(
            "{}/chat/completions",
            provider.base_url().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatCompleter for HttpChatCompleter {
    async fn complete(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CompletionError::ClientBuild(e.to_string()))?;

        let url = Self::completions_url(provider);
        let body = ChatCompletionRequest {
            model: provider.model(),
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(
            provider_name = %provider.name(),
            url = %url,
            prompt_length = prompt.len(),
            "Sending chat completion request"
        );

        let response = client
            .post(&url)
            .bearer_auth(provider.api_key())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Keep error bodies short; upstreams can return whole HTML pages
            let body: String = body.chars().take(200).collect();
            return Err(CompletionError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedResponse("no choices in response".into()))?;

        Ok(choice.message.content)
    }
}
