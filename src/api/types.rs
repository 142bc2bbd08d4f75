//! API response types.

use serde::Serialize;

use crate::forecast::{TREND_WINDOW, predict_next_load};
use crate::grid::{GridNode, NodeId, Tier};
use crate::sim::kpi::GridKpi;

/// Whole-grid response: every node in id order plus the KPI summary.
#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub nodes: Vec<NodeSummary>,
    pub kpi: GridKpi,
}

/// Readable projection of one node.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub name: String,
    pub tier: Tier,
    pub capacity: u64,
    pub current_load: u64,
    pub health_score: i32,
    pub is_active: bool,
    pub pending_units: u64,
    pub pending_requests: usize,
    pub predicted_load: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl From<&GridNode> for NodeSummary {
    fn from(n: &GridNode) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            tier: n.tier,
            capacity: n.capacity,
            current_load: n.current_load,
            health_score: n.health_score,
            is_active: n.is_active,
            pending_units: n.demand_queue.total_pending_units(),
            pending_requests: n.demand_queue.len(),
            predicted_load: predict_next_load(&n.history),
            left: n.left,
            right: n.right,
        }
    }
}

/// Load history for one node, newest first.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub id: NodeId,
    pub name: String,
    pub loads: Vec<u64>,
    pub avg_load_3: f64,
    pub predicted_load: u64,
}

impl From<&GridNode> for HistoryResponse {
    fn from(n: &GridNode) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            loads: n.history.entries_newest_first().collect(),
            avg_load_3: n.history.average_over_last(TREND_WINDOW),
            predicted_load: predict_next_load(&n.history),
        }
    }
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
