//! Browser chat front-end over HTTP.

pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::dispatch::{ConversationLog, Dispatcher};
use crate::telemetry::TelemetryRecorder;

/// Shared by every request. The log is per server, not per process.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub history: tokio::sync::Mutex<ConversationLog>,
    pub telemetry: Arc<Mutex<TelemetryRecorder>>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            history: tokio::sync::Mutex::new(ConversationLog::new()),
            telemetry: Arc::new(Mutex::new(TelemetryRecorder::new())),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/chat", post(routes::chat))
        .route("/history", get(routes::history))
        .route("/clear", get(routes::clear))
        .route("/stats", get(routes::stats))
        .with_state(state)
        .layer(cors)
}

/// Serves until `shutdown` is cancelled.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>, shutdown: CancellationToken) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Web chat listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Web chat stopped");
    Ok(())
}
