//! HTTP surface of the relay.
//!
//! Every route forwards to Azure DevOps through the operations held in
//! [`AppState`]; nothing is cached or stored between requests.

pub mod error;
pub mod handlers;
pub mod state;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::{ErrorBody, UPSTREAM_FAILURE_MESSAGE};
pub use state::AppState;

/// Prefix of the Azure DevOps routes.
pub const API_PREFIX: &str = "/v1/azure";

/// Creates the router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let azure = Router::new()
        .route("/projects/list", get(handlers::list_projects))
        .route("/teams/list", get(handlers::list_teams))
        .route("/teams/members/list", get(handlers::list_team_members))
        .route("/teams/iterations/list", get(handlers::list_team_iterations))
        .route(
            "/members/{member_id}/workItems",
            get(handlers::member_work_items),
        )
        .route(
            "/members/{member_id}/workItems/list",
            get(handlers::member_work_items),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest(API_PREFIX, azure)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_address` and serves until Ctrl-C or SIGTERM.
pub async fn serve(bind_address: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` completes.
///
/// In-flight requests are allowed to finish after the signal.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!(%address, "relay listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("relay stopped");
    Ok(())
}

/// Completes on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
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
                warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received, draining connections");
}
