//! Provider status endpoint
//!
//! Read surface over the health monitor's status store. An unprobed provider
//! reports "unknown", which is distinct from "down": absence of a probe
//! result is not a negative result.

use crate::handlers::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Last-known liveness of a provider as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Up,
    Down,
    Unknown,
}

impl From<Option<bool>> for ProviderStatus {
    fn from(alive: Option<bool>) -> Self {
        match alive {
            Some(true) => ProviderStatus::Up,
            Some(false) => ProviderStatus::Down,
            None => ProviderStatus::Unknown,
        }
    }
}

/// One provider's entry in the status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatusEntry {
    pub name: String,
    pub status: ProviderStatus,
}

/// Status response listing all configured providers in registry order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub providers: Vec<ProviderStatusEntry>,
}

/// GET /status handler
pub async fn handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let mut providers = Vec::with_capacity(state.registry().len());

    for provider in state.registry().providers() {
        let alive = state.status().get(provider.name()).await;
        providers.push(ProviderStatusEntry {
            name: provider.name().to_string(),
            status: alive.into(),
        });
    }

    Json(StatusResponse { providers })
}
