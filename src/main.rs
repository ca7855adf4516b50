//! Promptroute HTTP server
//!
//! Starts an Axum web server that answers prompts via the provider failover
//! dispatcher and exposes provider health status.

use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use promptroute::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    middleware::request_id_middleware,
    registry::ProviderRegistry,
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Load configuration
    let config = Arc::new(Config::from_file(&cli.config)?);

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    // Discover providers: env slots first, config list second. Fatal when
    // both are empty - the service must not start without providers.
    let registry = Arc::new(ProviderRegistry::load(&config)?);

    tracing::info!(
        provider_count = registry.len(),
        "Starting Promptroute server on {}:{}",
        config.server.host,
        config.server.port
    );

    let state = AppState::new(config.clone(), registry);

    // Background provider health checks feed the /status endpoint
    state.monitor().start_background_checks();

    // Build router
    let app = Router::new()
        .route("/ask", post(handlers::ask::handler))
        .route("/status", get(handlers::status::handler))
        .route("/health", get(handlers::health::handler))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Create socket address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    tracing::info!("Listening on {}", addr);
    tracing::info!("Ask endpoint available at http://{}/ask", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
