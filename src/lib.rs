//! Promptroute - failover dispatcher for OpenAI-compatible chat providers
//!
//! Routes a single prompt to one of several interchangeable chat-completion
//! backends, shuffling the provider order per request and walking the list
//! until one succeeds or all fail.

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod registry;
pub mod status;
pub mod telemetry;
