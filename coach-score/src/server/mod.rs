// Server module - HTTP server setup and routing
pub mod handlers;
pub mod models;
pub mod state;

use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::errors::CoachScoreError;
use self::state::AppState;

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/reviews",
            post(handlers::create_review).get(handlers::has_reviewed),
        )
        .route("/reviews/user/:user_id", get(handlers::reviews_by_user))
        .route(
            "/reviews/:review_id",
            get(handlers::get_review)
                .put(handlers::update_review)
                .delete(handlers::delete_review),
        )
        .route(
            "/reviews/:review_id/votes",
            post(handlers::cast_vote).get(handlers::current_vote),
        )
        .layer(create_cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Run the server on the specified address until Ctrl+C or SIGTERM
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), CoachScoreError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
