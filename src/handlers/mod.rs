//! HTTP request handlers for the Promptroute API

use crate::client::HttpChatCompleter;
use crate::config::Config;
use crate::dispatch::RequestDispatcher;
use crate::health::HealthMonitor;
use crate::registry::ProviderRegistry;
use crate::status::StatusStore;
use std::sync::Arc;
use std::time::Duration;

pub mod ask;
pub mod health;
pub mod status;

/// Application state shared across all handlers
///
/// Contains configuration, the provider registry, the failover dispatcher,
/// and the health monitor with its status store. All fields are Arc'd for
/// cheap cloning across Axum handlers. The status store is created here and
/// handed to both the monitor (writer) and the status handler (reader);
/// there is no process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    registry: Arc<ProviderRegistry>,
    dispatcher: Arc<RequestDispatcher>,
    monitor: Arc<HealthMonitor>,
    status: StatusStore,
}

impl AppState {
    /// Create a new AppState from configuration and a loaded registry
    pub fn new(config: Arc<Config>, registry: Arc<ProviderRegistry>) -> Self {
        let status = StatusStore::new();
        let request_timeout = Duration::from_secs(config.server.request_timeout_seconds);

        let completer = Arc::new(HttpChatCompleter::new(request_timeout));
        let dispatcher = Arc::new(RequestDispatcher::new(
            registry.clone(),
            completer,
            request_timeout,
            config.dispatch.debug_provider_prefix,
        ));
        let monitor = Arc::new(HealthMonitor::new(
            registry.clone(),
            status.clone(),
            &config.health,
        ));

        Self {
            config,
            registry,
            dispatcher,
            monitor,
            status,
        }
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Get reference to the failover dispatcher
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Get the health monitor handle (for spawning background checks)
    pub fn monitor(&self) -> Arc<HealthMonitor> {
        self.monitor.clone()
    }

    /// Get a handle to the provider status store
    pub fn status(&self) -> &StatusStore {
        &self.status
    }
}
