//! Health monitoring for chat providers
//!
//! Probes every provider's metadata endpoint (`GET {base_url}/models`) with a
//! short timeout and records the result in the shared `StatusStore`. Probes
//! are deliberately lightweight metadata listings, not generation calls, so
//! monitoring never consumes generation quota.
//!
//! The monitor runs independently of the dispatch path: the dispatcher does
//! not consult health status before attempting a provider, since a stale
//! negative probe must not stop a provider that has recovered from being
//! tried.

use crate::config::{HealthConfig, ProviderConfig};
use crate::registry::ProviderRegistry;
use crate::status::StatusStore;
use std::sync::Arc;
use std::time::Duration;

/// Probes provider liveness and records it in the status store
pub struct HealthMonitor {
    registry: Arc<ProviderRegistry>,
    status: StatusStore,
    probe_timeout: Duration,
    check_interval: Duration,
}

impl HealthMonitor {
    /// Create a monitor over the given registry, writing to `status`
    pub fn new(registry: Arc<ProviderRegistry>, status: StatusStore, config: &HealthConfig) -> Self {
        Self {
            registry,
            status,
            probe_timeout: Duration::from_secs(config.probe_timeout_seconds),
            check_interval: Duration::from_secs(config.check_interval_seconds),
        }
    }

    fn probe_url(provider: &ProviderConfig) -> String {
        format!("{}/models", provider.base_url().trim_end_matches('/'))
    }

    /// Probe a single provider's metadata endpoint
    ///
    /// Any error (timeout, DNS failure, non-2xx) is a negative result; probe
    /// failures are routine and never propagate.
    async fn probe(&self, provider: &ProviderConfig) -> bool {
        let client = match reqwest::Client::builder()
            .timeout(self.probe_timeout)
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(
                    provider_name = %provider.name(),
                    error = %e,
                    "Failed to create HTTP client for health probe"
                );
                return false;
            }
        };

        let url = Self::probe_url(provider);

        match client
            .get(&url)
            .bearer_auth(provider.api_key())
            .send()
            .await
        {
            Ok(response) => {
                let alive = response.status().is_success();
                tracing::debug!(
                    provider_name = %provider.name(),
                    url = %url,
                    status = %response.status(),
                    alive = alive,
                    "Health probe completed"
                );
                alive
            }
            Err(e) => {
                tracing::debug!(
                    provider_name = %provider.name(),
                    url = %url,
                    error = %e,
                    "Health probe failed"
                );
                false
            }
        }
    }

    /// Probe every provider once and overwrite its status entry
    ///
    /// Probes run concurrently; each writes its own key, so one provider's
    /// failure or slowness never blocks the others' results. Idempotent:
    /// repeated calls under unchanged provider behavior produce identical
    /// store content.
    pub async fn check_all(&self) {
        let probes = self.registry.providers().iter().map(|provider| async move {
            let alive = self.probe(provider).await;
            self.status.set(provider.name(), alive).await;
        });

        futures::future::join_all(probes).await;

        tracing::debug!(
            provider_count = self.registry.len(),
            "Health check batch completed"
        );
    }

    /// Start the background health checking task
    ///
    /// Spawns a tokio task that runs a check batch at the configured
    /// interval, plus a monitoring task that logs if the check loop ever
    /// terminates.
    pub fn start_background_checks(self: Arc<Self>) {
        let interval = self.check_interval;

        let handle = tokio::spawn(async move {
            tracing::info!(
                interval_seconds = interval.as_secs(),
                "Starting background health checks"
            );

            loop {
                self.check_all().await;
                tokio::time::sleep(interval).await;
            }
        });

        tokio::spawn(async move {
            match handle.await {
                Ok(_) => {
                    tracing::error!(
                        "Background health check task terminated unexpectedly. \
                        Provider statuses will go stale until restart."
                    );
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Background health check task panicked. Provider \
                        statuses will go stale until restart."
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, base_url: &str) -> ProviderConfig {
        ProviderConfig::new(name, base_url, "key", "model")
            .expect("test provider should be valid")
    }

    fn monitor_over(providers: Vec<ProviderConfig>) -> (HealthMonitor, StatusStore) {
        let registry =
            Arc::new(ProviderRegistry::from_providers(providers).expect("non-empty registry"));
        let status = StatusStore::new();
        let config = HealthConfig {
            probe_timeout_seconds: 1,
            check_interval_seconds: 30,
        };
        (
            HealthMonitor::new(registry, status.clone(), &config),
            status,
        )
    }

    #[test]
    fn test_probe_url_appends_models_path() {
        let p = provider("p1", "https://api.groq.com/openai/v1");
        assert_eq!(
            HealthMonitor::probe_url(&p),
            "https://api.groq.com/openai/v1/models"
        );
    }

    #[test]
    fn test_probe_url_trims_trailing_slash() {
        let p = provider("p1", "https://api.groq.com/openai/v1/");
        assert_eq!(
            HealthMonitor::probe_url(&p),
            "https://api.groq.com/openai/v1/models"
        );
    }

    #[tokio::test]
    async fn test_check_all_records_every_provider_even_when_all_fail() {
        // Nothing listens on these ports; every probe errors out quickly
        let (monitor, status) = monitor_over(vec![
            provider("down-1", "http://127.0.0.1:1/v1"),
            provider("down-2", "http://127.0.0.1:1/v1"),
        ]);

        monitor.check_all().await;

        assert_eq!(status.get("down-1").await, Some(false));
        assert_eq!(status.get("down-2").await, Some(false));
    }

    #[tokio::test]
    async fn test_check_all_is_idempotent_under_unchanged_behavior() {
        let (monitor, status) = monitor_over(vec![provider("down", "http://127.0.0.1:1/v1")]);

        monitor.check_all().await;
        let first = status.snapshot().await;

        monitor.check_all().await;
        let second = status.snapshot().await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unprobed_provider_stays_unknown() {
        let (_monitor, status) = monitor_over(vec![provider("p1", "http://127.0.0.1:1/v1")]);

        // No check_all yet: entry must be absent rather than false
        assert_eq!(status.get("p1").await, None);
    }
}
