//! Hierarchical load balancing over the grid tree.
//!
//! One pass walks the tree in pre-order. Each active node clamps its realized
//! load to capacity, and any excess demand is pushed down to its children or,
//! for leaves, redirected to a peer transformer with spare capacity. Inactive
//! nodes freeze their whole subtree for the pass.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::node::{GridNode, NodeId, Tier};
use super::topology::TransformerRegistry;
use crate::forecast::{TREND_WINDOW, predict_next_load};

/// Health lost by a node every time it overloads.
pub const OVERLOAD_HEALTH_PENALTY: i32 = 5;

/// Where a portion of excess demand was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferKind {
    /// Pushed down to a direct child.
    Child,
    /// Redirected across branches to another transformer.
    Peer,
}

/// Excess demand queued on another node as critical demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub to: NodeId,
    pub units: u64,
    pub kind: TransferKind,
}

/// Result of an overload at one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overload {
    /// Demand above capacity.
    pub excess: u64,
    pub transfers: Vec<Transfer>,
    /// Excess that found no target and was absorbed by the clamp.
    pub dropped: u64,
}

/// Snapshot of one node as processed during a pass.
#[derive(Debug, Clone, Serialize)]
pub struct NodeVisit {
    pub id: NodeId,
    pub name: String,
    pub tier: Tier,
    pub capacity: u64,
    pub total_demand: u64,
    pub current_load: u64,
    /// Average over the previous three passes, read before this pass is recorded.
    pub avg_load: f64,
    /// Health as reported at the start of the visit (before any overload penalty).
    pub health_score: i32,
    /// Expected load for the next pass, including this pass.
    pub predicted_load: u64,
    pub overload: Option<Overload>,
}

impl fmt::Display for NodeVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Node: {}]", self.name)?;
        write!(
            f,
            "Capacity: {} | Current Load: {} | Total Demand: {} | Avg Load (3 days): {:.2} | Health: {}%",
            self.capacity, self.current_load, self.total_demand, self.avg_load, self.health_score
        )?;
        if let Some(overload) = &self.overload {
            write!(
                f,
                "\nOverload at {}. Shifting {} excess units...",
                self.name, overload.excess
            )?;
            for t in &overload.transfers {
                match t.kind {
                    TransferKind::Child => write!(f, "\n  -> {} units to child {}", t.units, t.to)?,
                    TransferKind::Peer => {
                        write!(f, "\n  -> redirecting {} units to transformer {}", t.units, t.to)?
                    }
                }
            }
            if overload.dropped > 0 {
                write!(f, "\n  -> {} units could not be placed", overload.dropped)?;
            }
        }
        Ok(())
    }
}

/// One report row: a pending request on a node, as seen during a pass.
#[derive(Debug, Clone, Serialize)]
pub struct LoadRecord {
    pub node_name: String,
    pub tier: Tier,
    pub node_id: NodeId,
    pub capacity: u64,
    pub current_load: u64,
    pub avg_load: f64,
    pub health_score: i32,
    pub requested_at: DateTime<Local>,
}

/// Everything observed during one balancing pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceOutcome {
    /// Visited nodes in pre-order. Frozen subtrees are absent.
    pub visits: Vec<NodeVisit>,
    /// One row per pending request on every visited node.
    pub records: Vec<LoadRecord>,
}

impl BalanceOutcome {
    pub fn overloads(&self) -> impl Iterator<Item = (&NodeVisit, &Overload)> {
        self.visits
            .iter()
            .filter_map(|v| v.overload.as_ref().map(|o| (v, o)))
    }

    /// Total units moved with the given transfer kind.
    pub fn transferred_units(&self, kind: TransferKind) -> u64 {
        self.overloads()
            .flat_map(|(_, o)| o.transfers.iter())
            .filter(|t| t.kind == kind)
            .fold(0u64, |acc, t| acc.saturating_add(t.units))
    }

    pub fn dropped_units(&self) -> u64 {
        self.overloads().fold(0u64, |acc, (_, o)| acc.saturating_add(o.dropped))
    }

    pub fn visit(&self, id: NodeId) -> Option<&NodeVisit> {
        self.visits.iter().find(|v| v.id == id)
    }
}

/// Pre-order load balancer. Holds the transformer index used for redirection.
#[derive(Debug, Clone, Copy)]
pub struct LoadBalancer<'a> {
    registry: &'a TransformerRegistry,
}

impl<'a> LoadBalancer<'a> {
    pub fn new(registry: &'a TransformerRegistry) -> Self {
        Self { registry }
    }

    /// Runs one full pass from `root`, mutating node load, health and history.
    ///
    /// Demand queues are read, never drained: pending requests stay queued
    /// across passes and redistributed excess is added on top.
    pub fn balance(&self, nodes: &mut [GridNode], root: Option<NodeId>) -> BalanceOutcome {
        let mut outcome = BalanceOutcome::default();
        if let Some(root) = root {
            self.visit(nodes, root, &mut outcome);
        }
        outcome
    }

    fn visit(&self, nodes: &mut [GridNode], id: NodeId, outcome: &mut BalanceOutcome) {
        let Some(node) = nodes.get_mut(id.index()) else {
            return;
        };
        if !node.is_active {
            debug!(node = %node.name, "inactive, subtree frozen for this pass");
            return;
        }

        let total_demand = node.demand_queue.total_pending_units();
        let avg_load = node.history.average_over_last(TREND_WINDOW);
        node.current_load = total_demand.min(node.capacity);

        outcome
            .records
            .extend(node.demand_queue.all_pending().into_iter().map(|d| LoadRecord {
                node_name: node.name.clone(),
                tier: node.tier,
                node_id: node.id,
                capacity: node.capacity,
                current_load: node.current_load,
                avg_load,
                health_score: node.health_score,
                requested_at: d.timestamp,
            }));

        debug!(
            node = %node.name,
            demand = total_demand,
            load = node.current_load,
            capacity = node.capacity,
            "balancing node"
        );

        let health_score = node.health_score;
        let (left, right) = (node.left, node.right);
        let overload = if total_demand > node.capacity {
            node.health_score -= OVERLOAD_HEALTH_PENALTY;
            let excess = total_demand - node.capacity;
            warn!(node = %node.name, excess, health = node.health_score, "overload, shifting excess load");
            Some(self.redistribute(nodes, id, left, right, excess))
        } else {
            None
        };

        let node = &mut nodes[id.index()];
        node.history.record_load(node.current_load);

        outcome.visits.push(NodeVisit {
            id,
            name: node.name.clone(),
            tier: node.tier,
            capacity: node.capacity,
            total_demand,
            current_load: node.current_load,
            avg_load,
            health_score,
            predicted_load: predict_next_load(&node.history),
            overload,
        });

        if let Some(left) = left {
            self.visit(nodes, left, outcome);
        }
        if let Some(right) = right {
            self.visit(nodes, right, outcome);
        }
    }

    /// Splits excess between active children, or redirects it to a peer
    /// transformer when the node has no left child.
    fn redistribute(
        &self,
        nodes: &mut [GridNode],
        from: NodeId,
        left: Option<NodeId>,
        right: Option<NodeId>,
        excess: u64,
    ) -> Overload {
        let mut overload = Overload {
            excess,
            transfers: Vec::new(),
            dropped: 0,
        };

        let Some(left) = left else {
            match self.find_peer(nodes, from, excess) {
                Some(peer) => {
                    let target = &mut nodes[peer.index()];
                    info!(from = %from, to = %target.name, units = excess, "redirecting excess to peer transformer");
                    target.demand_queue.enqueue(excess, true);
                    overload.transfers.push(Transfer {
                        to: peer,
                        units: excess,
                        kind: TransferKind::Peer,
                    });
                }
                None => {
                    info!(from = %from, units = excess, "no transformer can absorb excess, dropping");
                    overload.dropped = excess;
                }
            }
            return overload;
        };

        let left_share = excess / 2;
        let shares = [(Some(left), left_share), (right, excess - left_share)];
        for (child, units) in shares {
            match child.and_then(|c| nodes.get_mut(c.index())).filter(|c| c.is_active) {
                Some(child) => {
                    child.demand_queue.enqueue(units, true);
                    overload.transfers.push(Transfer {
                        to: child.id,
                        units,
                        kind: TransferKind::Child,
                    });
                }
                None => overload.dropped = overload.dropped.saturating_add(units),
            }
        }
        overload
    }

    /// First active transformer other than `from` that can take all of `excess`
    /// on top of its current load.
    fn find_peer(&self, nodes: &[GridNode], from: NodeId, excess: u64) -> Option<NodeId> {
        self.registry.ids().iter().copied().find(|&id| {
            id != from
                && nodes.get(id.index()).is_some_and(|t| {
                    t.is_active && t.current_load.saturating_add(excess) <= t.capacity
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::topology;

    #[test]
    fn empty_grid_produces_empty_outcome() {
        let mut grid = topology::build(0);
        let outcome = grid.balance();
        assert!(outcome.visits.is_empty());
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn under_capacity_node_takes_full_demand() {
        let mut grid = topology::build(1);
        let id = NodeId(1);
        grid.enqueue_demand(id, 40, false).expect("node exists");
        grid.enqueue_demand(id, 20, true).expect("node exists");
        let outcome = grid.balance();

        let node = grid.node(id).map(|n| (n.current_load, n.health_score));
        assert_eq!(node, Some((60, 100)));
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.visits[0].overload.is_none());
    }

    #[test]
    fn lone_transformer_drops_excess_with_no_peer() {
        let mut grid = topology::build(1);
        grid.enqueue_demand(NodeId(1), 150, false).expect("node exists");
        let outcome = grid.balance();

        let node = grid.node(NodeId(1)).map(|n| (n.current_load, n.health_score));
        assert_eq!(node, Some((100, 95)));
        assert_eq!(outcome.dropped_units(), 50);
        // queue is never drained
        assert_eq!(
            grid.node(NodeId(1)).map(|n| n.demand_queue.total_pending_units()),
            Some(150)
        );
    }

    #[test]
    fn saturated_demand_still_clamps_and_overloads() {
        let mut grid = topology::build(1);
        grid.enqueue_demand(NodeId(1), u64::MAX, false).expect("node exists");
        grid.enqueue_demand(NodeId(1), 1, false).expect("node exists");
        let outcome = grid.balance();

        let node = grid.node(NodeId(1)).map(|n| (n.current_load, n.health_score));
        assert_eq!(node, Some((100, 95)));
        assert_eq!(outcome.visits[0].total_demand, u64::MAX);
        assert_eq!(outcome.dropped_units(), u64::MAX - 100);
        assert_eq!(grid.history(NodeId(1)).map(|h| h.entries_newest_first().next()).ok(), Some(Some(100)));
    }

    #[test]
    fn records_capture_pre_penalty_health_and_prior_average() {
        let mut grid = topology::build(1);
        grid.enqueue_demand(NodeId(1), 120, false).expect("node exists");
        grid.balance();
        let outcome = grid.balance();
        let rec = &outcome.records[0];
        assert_eq!(rec.health_score, 95);
        assert_eq!(rec.avg_load, 100.0);
        assert_eq!(rec.current_load, 100);
    }

    #[test]
    fn health_has_no_floor() {
        let mut grid = topology::build(1);
        grid.enqueue_demand(NodeId(1), 500, false).expect("node exists");
        for _ in 0..25 {
            grid.balance();
        }
        assert_eq!(grid.node(NodeId(1)).map(|n| n.health_score), Some(-25));
    }

    #[test]
    fn odd_excess_gives_larger_share_to_right_child() {
        let mut grid = topology::build(2);
        grid.enqueue_demand(NodeId(1), 251, false).expect("node exists");
        let outcome = grid.balance();
        let transfers = &outcome.visits[0]
            .overload
            .as_ref()
            .map(|o| o.transfers.clone())
            .unwrap_or_default();
        assert_eq!(
            transfers,
            &vec![
                Transfer { to: NodeId(2), units: 25, kind: TransferKind::Child },
                Transfer { to: NodeId(3), units: 26, kind: TransferKind::Child },
            ]
        );
    }

    #[test]
    fn inactive_child_share_is_dropped() {
        let mut grid = topology::build(2);
        grid.toggle_power(NodeId(2)).expect("node exists");
        grid.enqueue_demand(NodeId(1), 260, false).expect("node exists");
        let outcome = grid.balance();
        let overload = outcome.visits[0].overload.clone();
        assert_eq!(overload.as_ref().map(|o| o.dropped), Some(30));
        assert_eq!(
            grid.node(NodeId(3)).map(|n| n.current_load),
            Some(30)
        );
        assert_eq!(
            grid.node(NodeId(2)).map(|n| n.demand_queue.is_empty()),
            Some(true)
        );
    }

    #[test]
    fn peer_redirection_uses_first_fitting_transformer() {
        let mut grid = topology::build(3);
        // fill transformer 4 so it cannot absorb; 6 is the next candidate
        grid.enqueue_demand(NodeId(4), 90, false).expect("node exists");
        grid.balance();
        grid.enqueue_demand(NodeId(3), 140, false).expect("node exists");
        let outcome = grid.balance();

        let overload = outcome.visit(NodeId(3)).and_then(|v| v.overload.clone());
        assert_eq!(
            overload.map(|o| o.transfers),
            Some(vec![Transfer { to: NodeId(6), units: 40, kind: TransferKind::Peer }])
        );
        assert_eq!(
            grid.node(NodeId(6)).map(|n| n.current_load),
            Some(40)
        );
    }

    #[test]
    fn peer_redirection_skips_inactive_transformers() {
        let mut grid = topology::build(3);
        grid.toggle_power(NodeId(4)).expect("node exists");
        grid.enqueue_demand(NodeId(3), 130, false).expect("node exists");
        let outcome = grid.balance();
        let to = outcome
            .visit(NodeId(3))
            .and_then(|v| v.overload.as_ref())
            .and_then(|o| o.transfers.first())
            .map(|t| t.to);
        assert_eq!(to, Some(NodeId(6)));
    }

    #[test]
    fn display_includes_status_and_overload() {
        let mut grid = topology::build(1);
        grid.enqueue_demand(NodeId(1), 150, false).expect("node exists");
        let outcome = grid.balance();
        let text = outcome.visits[0].to_string();
        assert!(text.contains("[Node: Transformer 1]"));
        assert!(text.contains("Current Load: 100"));
        assert!(text.contains("Overload at Transformer 1"));
        assert!(text.contains("50 units could not be placed"));
    }
}
