//! Grid node, tier and id types.

use std::fmt;

use serde::Serialize;

use super::demand::DemandQueue;
use super::history::ConsumptionHistory;

/// Starting health score for every node.
pub const INITIAL_HEALTH: i32 = 100;

/// Identifies a node. Assigned in pre-order starting at 1 and stable for the
/// lifetime of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of this node in the grid arena.
    pub(crate) fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node's role in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    MainGrid,
    Substation,
    Transformer,
}

impl Tier {
    /// Tier for a node built with `levels` levels remaining beneath (and including) it.
    ///
    /// 3 → Main Grid, 2 → Substation, anything else → Transformer.
    pub fn for_levels_remaining(levels: usize) -> Self {
        match levels {
            3 => Self::MainGrid,
            2 => Self::Substation,
            _ => Self::Transformer,
        }
    }

    /// Fixed capacity in units for this tier.
    pub fn capacity(self) -> u64 {
        match self {
            Self::MainGrid => 300,
            Self::Substation => 200,
            Self::Transformer => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MainGrid => "Main Grid",
            Self::Substation => "Substation",
            Self::Transformer => "Transformer",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structural unit of the grid tree.
///
/// Children are referenced by id into the owning [`super::Grid`] arena; a
/// node is the only parent of its children.
#[derive(Debug, Clone)]
pub struct GridNode {
    pub name: String,
    pub tier: Tier,
    pub id: NodeId,
    /// Maximum load in units.
    pub capacity: u64,
    /// Decays by 5 per overload. Not floored at zero.
    pub health_score: i32,
    /// Realized load from the most recent balancing pass.
    pub current_load: u64,
    pub is_active: bool,
    pub demand_queue: DemandQueue,
    pub history: ConsumptionHistory,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl GridNode {
    /// Creates a fresh, active node named after its tier and id.
    pub fn new(tier: Tier, id: NodeId) -> Self {
        Self {
            name: format!("{} {}", tier.label(), id),
            tier,
            id,
            capacity: tier.capacity(),
            health_score: INITIAL_HEALTH,
            current_load: 0,
            is_active: true,
            demand_queue: DemandQueue::new(),
            history: ConsumptionHistory::new(),
            left: None,
            right: None,
        }
    }

    /// Children in left-then-right order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }
}
