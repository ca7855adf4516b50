//! Provider registry with two-stage discovery
//!
//! The registry is built once at startup and read-only thereafter. Discovery
//! order is significant: numbered environment slots are scanned first, and the
//! structured `[[providers]]` config list is used only when no slot is set.
//! An empty result from both sources is startup-fatal.

use crate::config::{Config, ProviderConfig};
use crate::error::{AppError, AppResult};

/// Environment variable prefix for slot discovery (`GROQ_API_KEY_1` .. `_5`)
pub const ENV_KEY_PREFIX: &str = "GROQ_API_KEY_";

/// Number of environment slots scanned during discovery
pub const ENV_SLOT_COUNT: usize = 5;

/// Endpoint and model bound to every env-discovered provider
const ENV_PROVIDER_BASE_URL: &str = "https://api.groq.com/openai/v1";
const ENV_PROVIDER_MODEL: &str = "llama-3.3-70b-versatile";

/// Immutable, ordered list of configured providers
///
/// Created once per process. Never mutated after construction.
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    /// Build the registry from environment slots, falling back to config
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if both sources yield zero providers. The
    /// service must not start in that state.
    pub fn load(config: &Config) -> AppResult<Self> {
        let slots: Vec<Option<String>> = (1..=ENV_SLOT_COUNT)
            .map(|i| std::env::var(format!("{}{}", ENV_KEY_PREFIX, i)).ok())
            .collect();

        Self::resolve(&slots, &config.providers)
    }

    /// Discovery logic, factored out of `load` so it can be exercised without
    /// touching process-global environment state.
    fn resolve(slots: &[Option<String>], fallback: &[ProviderConfig]) -> AppResult<Self> {
        let env_providers = Self::from_env_slots(slots)?;

        let (providers, source) = if env_providers.is_empty() {
            (fallback.to_vec(), "config")
        } else {
            (env_providers, "env")
        };

        if providers.is_empty() {
            return Err(AppError::Config(format!(
                "no providers configured: no {}1..{}{} environment variables set \
                and no [[providers]] entries in the config file",
                ENV_KEY_PREFIX, ENV_KEY_PREFIX, ENV_SLOT_COUNT
            )));
        }

        tracing::info!(
            provider_count = providers.len(),
            discovery_source = source,
            "Provider registry loaded"
        );

        Ok(Self { providers })
    }

    /// Build providers from indexed credential slots
    ///
    /// Slot `i` (1-based) with a non-empty credential yields provider
    /// `Groq-Env-<i>` bound to the fixed Groq endpoint and model. Empty or
    /// absent slots are skipped without renumbering later slots.
    fn from_env_slots(slots: &[Option<String>]) -> AppResult<Vec<ProviderConfig>> {
        let mut providers = Vec::new();

        for (index, slot) in slots.iter().enumerate() {
            let Some(api_key) = slot else {
                continue;
            };
            if api_key.trim().is_empty() {
                continue;
            }

            providers.push(ProviderConfig::new(
                format!("Groq-Env-{}", index + 1),
                ENV_PROVIDER_BASE_URL,
                api_key.clone(),
                ENV_PROVIDER_MODEL,
            )?);
        }

        Ok(providers)
    }

    /// Build a registry from an explicit provider list
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the list is empty.
    pub fn from_providers(providers: Vec<ProviderConfig>) -> AppResult<Self> {
        if providers.is_empty() {
            return Err(AppError::Config(
                "provider registry cannot be empty".to_string(),
            ));
        }
        Ok(Self { providers })
    }

    /// Get the providers in discovery order
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    /// Get the number of configured providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry holds no providers (never true after `load`)
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
