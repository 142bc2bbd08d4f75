//! Read-only REST API over the final grid state.
//!
//! Provides two GET endpoints:
//! - `/grid`: every node plus the KPI summary
//! - `/nodes/{id}/history`: newest-first load history for one node

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::grid::Grid;
use crate::sim::kpi::GridKpi;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the batch run completes and wrapped in
/// `Arc`. All data is read-only, so no locks.
pub struct AppState {
    /// Grid as it stands after the last pass.
    pub grid: Grid,
    /// Aggregate KPI report for the run.
    pub kpi: GridKpi,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/grid", get(handlers::get_grid))
        .route("/nodes/{id}/history", get(handlers::get_history))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
