//! HTTP server setup and routing

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::middleware::auth_middleware;
use crate::api::{accounts, handlers};
use crate::error::ApiError;
use crate::state::AppContext;

/// Uploads larger than this are rejected before they reach a handler
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router
///
/// The prediction and history routes run behind the auth middleware; the
/// health and account routes are open.
pub fn build_router(ctx: AppContext) -> Router {
    let protected = Router::new()
        .route("/recommendation", post(handlers::recommendation))
        .route("/disease-detection", post(handlers::disease_detection))
        .route("/history", get(handlers::history))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/signup", post(accounts::signup))
        .route("/auth/signin", post(accounts::signin))
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Run the HTTP API server until shutdown
pub async fn run(ctx: AppContext, port: u16) -> Result<(), ApiError> {
    let app = build_router(ctx);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
