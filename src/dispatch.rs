//! Provider failover dispatch
//!
//! `RequestDispatcher::ask` shuffles the registry's providers uniformly per
//! call (this is the load-balancing mechanism; no state carries between
//! calls) and walks the permutation sequentially until one provider answers.
//! Attempts are strictly sequential: first-success-wins requires
//! short-circuiting, and racing providers would waste quota on backends
//! billed per call.
//!
//! `ask` never fails. Per-attempt failures are routine data collected into
//! the result, and total failure comes back as an overload summary string.

use crate::client::ChatCompleter;
use crate::registry::ProviderRegistry;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Diagnostic record for one failed provider attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    provider: String,
    message: String,
}

impl AttemptFailure {
    fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Name of the provider that failed
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Human-readable failure reason
    pub fn message(&self) -> &str {
        &self.message
    }

    fn render(&self) -> String {
        format!("Provider '{}' failed: {}", self.provider, self.message)
    }
}

/// Result of one dispatch call
///
/// Failures are values, not errors: the "try next on failure" policy is a
/// visible data-flow decision, and `Exhausted` carries every attempt's
/// diagnostic in attempt order.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A provider answered; the remaining candidates were never attempted
    Completed { provider: String, text: String },
    /// Every provider in the permutation failed
    Exhausted(Vec<AttemptFailure>),
}

/// Walks a per-call random permutation of providers until one succeeds
pub struct RequestDispatcher {
    registry: Arc<ProviderRegistry>,
    completer: Arc<dyn ChatCompleter>,
    attempt_timeout: Duration,
    debug_provider_prefix: bool,
}

impl RequestDispatcher {
    /// Create a dispatcher over the given registry and completion capability
    pub fn new(
        registry: Arc<ProviderRegistry>,
        completer: Arc<dyn ChatCompleter>,
        attempt_timeout: Duration,
        debug_provider_prefix: bool,
    ) -> Self {
        Self {
            registry,
            completer,
            attempt_timeout,
            debug_provider_prefix,
        }
    }

    /// Answer a prompt, falling over across providers
    ///
    /// Infallible by contract: total failure is encoded in the returned text
    /// (`System Overloaded. Errors: ...`), so callers inspect content rather
    /// than a status code.
    pub async fn ask(&self, prompt: &str) -> String {
        match self.dispatch(prompt).await {
            DispatchOutcome::Completed { provider, text } => {
                if self.debug_provider_prefix {
                    format!("[DEBUG: {}] \n\n{}", provider, text)
                } else {
                    text
                }
            }
            DispatchOutcome::Exhausted(failures) => {
                let joined: Vec<String> = failures.iter().map(AttemptFailure::render).collect();
                format!("System Overloaded. Errors: {}", joined.join("; "))
            }
        }
    }

    /// Run the failover loop and return the structured outcome
    pub async fn dispatch(&self, prompt: &str) -> DispatchOutcome {
        // Fresh uniform permutation per call (Fisher-Yates via SliceRandom)
        let mut order: Vec<usize> = (0..self.registry.len()).collect();
        order.shuffle(&mut rand::rng());

        let mut failures = Vec::new();

        for index in order {
            let provider = &self.registry.providers()[index];

            tracing::debug!(
                provider_name = %provider.name(),
                attempt = failures.len() + 1,
                total_providers = self.registry.len(),
                "Attempting provider"
            );

            // Each attempt gets its own timeout budget; a timed-out attempt
            // is an ordinary failure, never an error to the caller
            let attempt = tokio::time::timeout(
                self.attempt_timeout,
                self.completer.complete(provider, prompt),
            )
            .await;

            match attempt {
                Ok(Ok(text)) => {
                    tracing::info!(
                        provider_name = %provider.name(),
                        attempts = failures.len() + 1,
                        response_length = text.len(),
                        "Provider answered"
                    );
                    return DispatchOutcome::Completed {
                        provider: provider.name().to_string(),
                        text,
                    };
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        provider_name = %provider.name(),
                        error = %e,
                        "Provider attempt failed, trying next candidate"
                    );
                    failures.push(AttemptFailure::new(provider.name(), e.to_string()));
                }
                Err(_) => {
                    tracing::warn!(
                        provider_name = %provider.name(),
                        timeout_seconds = self.attempt_timeout.as_secs(),
                        "Provider attempt timed out, trying next candidate"
                    );
                    failures.push(AttemptFailure::new(
                        provider.name(),
                        format!("timed out after {}s", self.attempt_timeout.as_secs()),
                    ));
                }
            }
        }

        tracing::error!(
            failure_count = failures.len(),
            "All providers failed for this request"
        );
        DispatchOutcome::Exhausted(failures)
    }
}
