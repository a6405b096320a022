//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use payflow_types::{Notifier, PaymentGateway, TransactionStore};

use super::handlers::{self, AppState};
use crate::PaymentProcessor;

/// HTTP Server for the Payments API.
pub struct HttpServer<G, S, N> {
    state: Arc<AppState<G, S, N>>,
}

impl<G, S, N> HttpServer<G, S, N>
where
    G: PaymentGateway,
    S: TransactionStore,
    N: Notifier,
{
    /// Creates a new HTTP server around the given processor.
    pub fn new(processor: PaymentProcessor<G, S, N>) -> Self {
        Self {
            state: Arc::new(AppState { processor }),
        }
    }

    /// Returns the processor behind the routes.
    pub fn processor(&self) -> &PaymentProcessor<G, S, N> {
        &self.state.processor
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/payments", post(handlers::process_payment::<G, S, N>))
            .route(
                "/api/payments/{id}/refund",
                post(handlers::refund_payment::<G, S, N>),
            )
            .route(
                "/api/users/{user_id}/transactions",
                get(handlers::list_user_transactions::<G, S, N>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
