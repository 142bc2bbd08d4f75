//! Grid tree model, topology construction and load balancing.

/// Pre-order load balancing and overload redistribution.
pub mod balancer;
/// Priority-ordered pending demand.
pub mod demand;
/// Realized-load history.
pub mod history;
pub mod node;
/// Balanced binary tree construction.
pub mod topology;

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;

pub use balancer::{BalanceOutcome, LoadBalancer, LoadRecord, NodeVisit, Overload, Transfer, TransferKind};
pub use demand::{DemandQueue, DemandRequest};
pub use history::ConsumptionHistory;
pub use node::{GridNode, NodeId, Tier};
pub use topology::TransformerRegistry;

use crate::error::GridError;

/// Active nodes carrying the highest and lowest current load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadExtremes {
    pub max: NodeId,
    pub max_load: u64,
    pub min: NodeId,
    pub min_load: u64,
}

/// A fixed binary tree of grid nodes stored in an id-indexed arena.
///
/// The tree shape never changes after [`topology::build`]; only load,
/// health, history, demand and power state move.
#[derive(Debug, Clone)]
pub struct Grid {
    nodes: Vec<GridNode>,
    root: Option<NodeId>,
    transformers: TransformerRegistry,
}

impl Grid {
    pub(crate) fn from_parts(
        nodes: Vec<GridNode>,
        root: Option<NodeId>,
        transformers: TransformerRegistry,
    ) -> Self {
        Self {
            nodes,
            root,
            transformers,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&GridNode> {
        self.root.and_then(|id| self.node(id))
    }

    /// All nodes in id (pre-order) order.
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn transformers(&self) -> &TransformerRegistry {
        &self.transformers
    }

    /// Direct arena access by id.
    pub fn node(&self, id: NodeId) -> Option<&GridNode> {
        self.nodes.get(id.index())
    }

    /// Breadth-first search from the root.
    pub fn find(&self, id: NodeId) -> Option<&GridNode> {
        self.find_index(id).map(|i| &self.nodes[i])
    }

    fn find_index(&self, id: NodeId) -> Option<usize> {
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        while let Some(current) = queue.pop_front() {
            let node = self.nodes.get(current.index())?;
            if node.id == id {
                return Some(current.index());
            }
            queue.extend(node.children());
        }
        None
    }

    fn find_mut(&mut self, id: NodeId) -> Result<&mut GridNode, GridError> {
        let index = self.find_index(id).ok_or(GridError::NodeNotFound { id })?;
        Ok(&mut self.nodes[index])
    }

    /// Queues a demand request on the node with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NodeNotFound`] if no such node exists.
    pub fn enqueue_demand(&mut self, id: NodeId, units: u64, is_critical: bool) -> Result<(), GridError> {
        let node = self.find_mut(id)?;
        node.demand_queue.enqueue(units, is_critical);
        info!(node = %node.name, units, is_critical, "demand queued");
        Ok(())
    }

    /// Realized-load history of the node with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NodeNotFound`] if no such node exists.
    pub fn history(&self, id: NodeId) -> Result<&ConsumptionHistory, GridError> {
        self.find(id)
            .map(|n| &n.history)
            .ok_or(GridError::NodeNotFound { id })
    }

    /// Flips a node between active and inactive and returns the new state.
    ///
    /// Load is left untouched; the next pass skips the node and its subtree
    /// while it is inactive.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NodeNotFound`] if no such node exists.
    pub fn toggle_power(&mut self, id: NodeId) -> Result<bool, GridError> {
        let node = self.find_mut(id)?;
        node.is_active = !node.is_active;
        info!(node = %node.name, active = node.is_active, "power toggled");
        Ok(node.is_active)
    }

    /// Pre-order walk of every node, including descendants of inactive nodes.
    pub fn preorder(&self) -> Vec<&GridNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(node);
            stack.extend(node.right);
            stack.extend(node.left);
        }
        out
    }

    /// Highest and lowest loaded active nodes; the first in pre-order wins ties.
    ///
    /// Returns `None` when no node is active.
    pub fn load_extremes(&self) -> Option<LoadExtremes> {
        let mut active = self.preorder().into_iter().filter(|n| n.is_active);
        let first = active.next()?;
        let (mut max, mut min) = (first, first);
        for node in active {
            if node.current_load > max.current_load {
                max = node;
            }
            if node.current_load < min.current_load {
                min = node;
            }
        }
        Some(LoadExtremes {
            max: max.id,
            max_load: max.current_load,
            min: min.id,
            min_load: min.current_load,
        })
    }

    /// Runs one balancing pass over the whole tree.
    pub fn balance(&mut self) -> BalanceOutcome {
        LoadBalancer::new(&self.transformers).balance(&mut self.nodes, self.root)
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut GridNode> {
        self.nodes.get_mut(id.index())
    }
}
