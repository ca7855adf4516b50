//! Shared provider health state
//!
//! `StatusStore` maps provider name to last-known liveness. The health
//! monitor is the only writer; observers (the `/status` handler, tests)
//! read. A provider has no entry until its first probe completes, and a
//! missing entry means "unknown" - callers must not conflate it with "down".
//!
//! The store is an explicit instance handed to each collaborator, not a
//! process-wide singleton, so independent instances never interfere.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Concurrency-safe provider liveness map
///
/// Clones share the same underlying map (cheap `Arc` clone). Each key is
/// owned by its provider's probe, so plain last-write-wins semantics are
/// sufficient; no transactional coordination is needed.
#[derive(Clone, Debug, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<HashMap<String, bool>>>,
}

impl StatusStore {
    /// Create an empty store (all providers start "unknown")
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest probe result for a provider
    pub async fn set(&self, name: &str, alive: bool) {
        let mut map = self.inner.write().await;
        map.insert(name.to_string(), alive);
    }

    /// Get a provider's last-known liveness
    ///
    /// Returns `None` when the provider has never been probed. `Some(false)`
    /// means an actual negative probe result.
    pub async fn get(&self, name: &str) -> Option<bool> {
        let map = self.inner.read().await;
        map.get(name).copied()
    }

    /// Snapshot the full map for display
    pub async fn snapshot(&self) -> HashMap<String, bool> {
        let map = self.inner.read().await;
        map.clone()
    }
}
