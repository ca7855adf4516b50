//! Command-line interface for Promptroute
//!
//! Provides argument parsing and subcommand handling for the Promptroute binary.

use clap::{Parser, Subcommand};

/// Failover dispatcher for OpenAI-compatible chat providers
#[derive(Parser)]
#[command(name = "promptroute")]
#[command(version)]
#[command(about = "Failover dispatcher for OpenAI-compatible chat providers")]
#[command(
    long_about = "Promptroute answers a prompt by shuffling the configured chat \
    providers and trying each in turn until one succeeds, while a background \
    monitor tracks every provider's liveness."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Promptroute Configuration
# =========================
#
# This file configures the HTTP server, the fallback provider list, health
# monitoring, and observability settings for Promptroute.
#
# Provider discovery order:
#   1. Environment slots GROQ_API_KEY_1 .. GROQ_API_KEY_5 (each set slot
#      yields one provider bound to the Groq endpoint)
#   2. The [[providers]] entries below, used only when no slot is set

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 3000

# Per-attempt timeout for chat completion calls in seconds
request_timeout_seconds = 30

# Fallback providers (any OpenAI-compatible backend)
#
# Provider fields:
#   - name: Unique human-readable identifier
#   - base_url: OpenAI-compatible API root (usually ends with /v1)
#   - api_key: Bearer credential (never logged)
#   - model: Model identifier sent to the backend

[[providers]]
name = "groq-main"
base_url = "https://api.groq.com/openai/v1"
api_key = "your-api-key"
model = "llama-3.3-70b-versatile"

# Add additional providers for failover:
# [[providers]]
# name = "openrouter-backup"
# base_url = "https://openrouter.ai/api/v1"
# api_key = "your-api-key"
# model = "meta-llama/llama-3.3-70b-instruct"

[health]
# Per-probe timeout in seconds (probes hit GET {base_url}/models)
probe_timeout_seconds = 3

# Interval between background health check batches in seconds
check_interval_seconds = 30

[dispatch]
# Prefix successful answers with the winning provider's name (diagnostic aid)
debug_provider_prefix = false

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}
