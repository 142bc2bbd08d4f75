//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, GridResponse, HistoryResponse, NodeSummary};
use crate::grid::NodeId;

/// Returns every node and the KPI summary.
///
/// `GET /grid` → 200 + `GridResponse` JSON
pub async fn get_grid(State(state): State<Arc<AppState>>) -> Json<GridResponse> {
    Json(GridResponse {
        nodes: state.grid.nodes().iter().map(NodeSummary::from).collect(),
        kpi: state.kpi.clone(),
    })
}

/// Returns one node's load history.
///
/// `GET /nodes/{id}/history` → 200 + `HistoryResponse` JSON
/// `GET /nodes/99/history` → 404 + `ErrorResponse` when the id is unknown
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    let id = NodeId(id);
    match state.grid.find(id) {
        Some(node) => Ok(Json(HistoryResponse::from(node))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("node {id} not found"),
            }),
        )),
    }
}
