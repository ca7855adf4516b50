//! Integration test for end-to-end provider discovery
//!
//! `ProviderRegistry::load` reads real environment variables, so every
//! scenario runs inside one test function: Rust runs tests in parallel and
//! concurrent env mutation would race.

use promptroute::config::Config;
use promptroute::registry::{ENV_KEY_PREFIX, ENV_SLOT_COUNT, ProviderRegistry};

fn config_without_providers() -> Config {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 3000
"#;
    toml::from_str(toml).expect("should parse test config")
}

fn config_with_fallback_provider() -> Config {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 3000

[[providers]]
name = "fallback"
base_url = "https://api.example.com/v1"
api_key = "cfg-key"
model = "cfg-model"
"#;
    toml::from_str(toml).expect("should parse test config")
}

fn clear_env_slots() {
    for i in 1..=ENV_SLOT_COUNT {
        // SAFETY: this is the only test in this binary touching the
        // environment, and it runs single-threaded within itself
        unsafe { std::env::remove_var(format!("{}{}", ENV_KEY_PREFIX, i)) };
    }
}

#[test]
fn test_discovery_order_env_then_config_then_fatal() {
    clear_env_slots();

    // Scenario 1: no env slots, no config providers - startup-fatal
    let result = ProviderRegistry::load(&config_without_providers());
    assert!(result.is_err(), "empty discovery must fail registry load");

    // Scenario 2: no env slots - config fallback is used
    let registry = ProviderRegistry::load(&config_with_fallback_provider())
        .expect("config fallback should load");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.providers()[0].name(), "fallback");

    // Scenario 3: env slots set - they take precedence over config, names
    // derive from slot indices, and gaps keep their numbering
    unsafe {
        std::env::set_var(format!("{}1", ENV_KEY_PREFIX), "key-one");
        std::env::set_var(format!("{}3", ENV_KEY_PREFIX), "key-three");
    }

    let registry = ProviderRegistry::load(&config_with_fallback_provider())
        .expect("env discovery should load");
    let names: Vec<&str> = registry.providers().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Groq-Env-1", "Groq-Env-3"]);
    assert_eq!(registry.providers()[0].api_key(), "key-one");
    assert_eq!(
        registry.providers()[0].base_url(),
        "https://api.groq.com/openai/v1"
    );

    clear_env_slots();
}
