//! Ask endpoint handler
//!
//! Handles POST /ask requests by handing the prompt to the failover
//! dispatcher. The handler never returns a provider-level error: total
//! provider failure comes back as an ordinary answer body containing the
//! overload summary.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum allowed prompt length in characters
const MAX_PROMPT_LENGTH: usize = 100_000;

/// Ask request from client
///
/// Validation is enforced during deserialization - invalid instances cannot exist.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    prompt: String,
}

impl AskRequest {
    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Custom Deserialize implementation that validates during deserialization
impl<'de> Deserialize<'de> for AskRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawAskRequest {
            prompt: String,
        }

        let raw = RawAskRequest::deserialize(deserializer)?;

        if raw.prompt.trim().is_empty() {
            return Err(serde::de::Error::custom(
                "prompt cannot be empty or contain only whitespace",
            ));
        }

        let char_count = raw.prompt.chars().count();
        if char_count > MAX_PROMPT_LENGTH {
            return Err(serde::de::Error::custom(format!(
                "prompt exceeds maximum length of {} characters (got {})",
                MAX_PROMPT_LENGTH, char_count
            )));
        }

        Ok(AskRequest { prompt: raw.prompt })
    }
}

/// Ask response to client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated text, or the overload summary when every provider failed
    pub answer: String,
}

/// POST /ask handler
///
/// Malformed or invalid request bodies become a 400 with the crate's error
/// body via `AppError::Validation`. Provider failures never surface as
/// errors here; latency is dominated by the provider attempts, each with its
/// own timeout budget, so worst case is roughly
/// `provider_count * request_timeout`.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(
            request_id = %request_id,
            reason = %rejection.body_text(),
            "Rejected invalid ask request"
        );
        AppError::Validation(rejection.body_text())
    })?;

    tracing::debug!(
        request_id = %request_id,
        prompt_length = request.prompt().len(),
        "Received ask request"
    );

    let answer = state.dispatcher().ask(request.prompt()).await;

    tracing::info!(
        request_id = %request_id,
        answer_length = answer.len(),
        "Ask request completed"
    );

    Ok(Json(AskResponse { answer }))
}
