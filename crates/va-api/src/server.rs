//! HTTP server
//!
//! Builds the axum app and runs it until Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use va_core::{Config, SessionStore, TurnExecutor};

use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub executor: Arc<TurnExecutor>,
}

impl AppState {
    pub fn new(config: Config, sessions: SessionStore, executor: TurnExecutor) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            executor: Arc::new(executor),
        }
    }
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        None => CorsLayer::permissive(),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// The full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config.server.allowed_origins.as_deref());

    Router::new()
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resolves on Ctrl+C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Serve the API on the configured port until Ctrl+C
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server.port));
    let app = app(state);

    info!("Voice desk listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
