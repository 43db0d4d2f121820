use anyhow::{Context, Result};
use answer_service::{create_answer_service, AnswerService};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;

use crate::config::GatewayConfig;
use crate::cors::cors_layer;
use crate::handlers::{handle_query, handle_root, health_check};
use crate::query_payload::ValidationPolicy;
use crate::request_log::request_log_middleware;

/// Shared, read-only state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub answers: Arc<dyn AnswerService>,
    pub root_policy: ValidationPolicy,
    pub query_policy: ValidationPolicy,
}

/// The HTTP gateway, built once at startup and handed to the listener.
pub struct Gateway {
    config: GatewayConfig,
    answers: Arc<dyn AnswerService>,
}

impl Gateway {
    pub fn new(config: GatewayConfig, answers: Arc<dyn AnswerService>) -> Self {
        Self { config, answers }
    }

    /// Wires the answer backend named in the config.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let answers = create_answer_service(&config.backend)?;
        Ok(Self::new(config, answers))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn router(&self) -> Result<Router> {
        let state = AppState {
            answers: self.answers.clone(),
            root_policy: self.config.root_policy,
            query_policy: self.config.query_policy,
        };

        let body_limit = match self.config.max_body_bytes {
            Some(max) => DefaultBodyLimit::max(max),
            None => DefaultBodyLimit::disable(),
        };

        Ok(Router::new()
            .route("/", post(handle_root))
            .route("/query", post(handle_query))
            .route("/health", get(health_check))
            .layer(body_limit)
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(request_log_middleware))
                    .layer(cors_layer(&self.config.cors)?),
            )
            .with_state(state))
    }

    /// Serves until Ctrl+C, then drains in-flight requests.
    pub async fn serve(self) -> Result<()> {
        let app = self.router()?;

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.config.addr))?;
        log::info!("Listening on {}", listener.local_addr()?);
        log::info!(
            "POST / uses {:?} validation, POST /query uses {:?} validation",
            self.config.root_policy,
            self.config.query_policy
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        log::info!("Gateway shut down");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Ctrl+C received, shutting down"),
        _ = terminate => log::info!("SIGTERM received, shutting down"),
    }
}
