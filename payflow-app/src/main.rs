//! # Payflow Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the simulated gateway, store and notifier
//! - Create the payment processor
//! - Start the rate-limiter sweeper and the HTTP server

mod config;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use payflow_engine::{PaymentProcessor, RateLimiter, inbound::HttpServer};
use payflow_sim::{InMemoryStore, SimulatedGateway, TracingNotifier};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,payflow_app=debug,payflow_engine=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;
    init_tracing(config.json_logs);

    tracing::info!("Starting payflow server on port {}", config.port);
    tracing::info!(
        max_requests = config.engine.rate_limit_max_requests,
        window_secs = config.engine.rate_limit_window.as_secs(),
        fraud_threshold = config.engine.fraud_threshold,
        "Engine policy loaded"
    );

    let processor = PaymentProcessor::with_config(
        SimulatedGateway::new(),
        InMemoryStore::new(),
        TracingNotifier::new(),
        config.engine.clone(),
    );

    let server = HttpServer::new(processor);
    let sweeper = tokio::spawn(sweep_rate_limiter(
        server.processor().shared_rate_limiter(),
        config.sweep_interval,
    ));

    let addr = format!("0.0.0.0:{}", config.port);
    let result = server.run(&addr).await;

    sweeper.abort();
    result
}

/// Periodically drops users with no attempts left in the rate-limit window.
async fn sweep_rate_limiter(limiter: Arc<RateLimiter>, every: std::time::Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = limiter.sweep();
        if removed > 0 {
            tracing::debug!(
                removed,
                tracked = limiter.tracked_users(),
                "Swept idle rate-limit entries"
            );
        }
    }
}
