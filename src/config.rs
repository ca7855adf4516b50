//! Configuration management for Promptroute
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Provider credentials are sensitive: `ProviderConfig` redacts the API key
//! from its `Debug` output so it can never leak through logging.

use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    /// Fallback provider list, used only when env-slot discovery yields nothing
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// A single chat-completion provider
///
/// All fields are private to enforce invariants. Instances are created either
/// via deserialization (config file) or `ProviderConfig::new` (env discovery);
/// both paths reject empty fields, so a constructed provider is always usable.
#[derive(Clone)]
pub struct ProviderConfig {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
}

impl ProviderConfig {
    /// Create a validated provider
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if any field is empty or whitespace-only.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> crate::error::AppResult<Self> {
        let provider = Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        };

        for (field, value) in [
            ("name", &provider.name),
            ("base_url", &provider.base_url),
            ("api_key", &provider.api_key),
            ("model", &provider.model),
        ] {
            if value.trim().is_empty() {
                return Err(crate::error::AppError::Config(format!(
                    "provider field '{}' must not be empty",
                    field
                )));
            }
        }

        Ok(provider)
    }

    /// Get the provider name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the provider base URL (OpenAI-compatible API root, e.g. ".../v1")
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the model identifier sent to the backend
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Redacts the API key. Provider configs appear in tracing fields and error
/// paths, and the credential must never be logged. The type deliberately
/// does not implement `Serialize` either, so there is no un-redacted egress
/// path for the key.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Custom Deserialize implementation that routes through the validated
/// constructor, so invalid providers cannot exist after config loading.
impl<'de> Deserialize<'de> for ProviderConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawProviderConfig {
            name: String,
            base_url: String,
            api_key: String,
            model: String,
        }

        let raw = RawProviderConfig::deserialize(deserializer)?;

        ProviderConfig::new(raw.name, raw.base_url, raw.api_key, raw.model)
            .map_err(|e| serde::de::Error::custom(format!("Invalid provider: {}", e)))
    }
}

/// Health monitoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Per-probe timeout in seconds (aggressive by design; probes are cheap)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
    /// Interval between background check batches in seconds
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout_seconds: default_probe_timeout(),
            check_interval_seconds: default_check_interval(),
        }
    }
}

fn default_probe_timeout() -> u64 {
    3
}

fn default_check_interval() -> u64 {
    30
}

/// Dispatch behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchConfig {
    /// When true, successful answers are prefixed with the winning provider's
    /// name. Diagnostic aid, off by default.
    #[serde(default)]
    pub debug_provider_prefix: bool,
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config.validate().map_err(|e| {
            crate::error::AppError::Config(format!(
                "validation of '{}' failed: {}",
                path_display, e
            ))
        })?;

        Ok(config)
    }

    /// Validate cross-field invariants that serde cannot express
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.health.probe_timeout_seconds == 0 || self.health.probe_timeout_seconds > 60 {
            return Err(crate::error::AppError::Config(format!(
                "health.probe_timeout_seconds must be in (0, 60], got {}",
                self.health.probe_timeout_seconds
            )));
        }

        if self.health.check_interval_seconds == 0 || self.health.check_interval_seconds > 3600 {
            return Err(crate::error::AppError::Config(format!(
                "health.check_interval_seconds must be in (0, 3600], got {}",
                self.health.check_interval_seconds
            )));
        }

        if self.server.request_timeout_seconds == 0 || self.server.request_timeout_seconds > 300 {
            return Err(crate::error::AppError::Config(format!(
                "server.request_timeout_seconds must be in (0, 300], got {}",
                self.server.request_timeout_seconds
            )));
        }

        // Duplicate provider names would make StatusStore entries ambiguous
        let mut seen = std::collections::HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.name()) {
                return Err(crate::error::AppError::Config(format!(
                    "duplicate provider name '{}'",
                    provider.name()
                )));
            }
        }

        Ok(())
    }
}
