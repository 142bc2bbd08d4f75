//! Balanced binary grid construction.

use tracing::debug;

use super::node::{GridNode, NodeId, Tier};
use super::Grid;

/// Read-only index of every Transformer-tier node, in creation order.
///
/// Built once alongside the tree and handed to the load balancer for
/// cross-branch redirection.
#[derive(Debug, Clone, Default)]
pub struct TransformerRegistry {
    ids: Vec<NodeId>,
}

impl TransformerRegistry {
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Builds a complete binary tree with exactly `depth` levels.
///
/// Tiers are assigned from the number of levels remaining at each node, so
/// only `depth == 3` yields the full Main Grid → Substation → Transformer
/// layering. Ids are assigned in pre-order from 1. `depth == 0` yields an
/// empty grid.
///
/// # Examples
///
/// ```
/// use grid_balancer::grid::{topology, Tier};
///
/// let grid = topology::build(3);
/// assert_eq!(grid.len(), 7);
/// assert_eq!(grid.transformers().len(), 4);
/// assert_eq!(grid.root_node().map(|n| n.tier), Some(Tier::MainGrid));
/// ```
pub fn build(depth: usize) -> Grid {
    let mut nodes = Vec::new();
    let mut registry = TransformerRegistry::default();
    let root = build_level(depth, &mut nodes, &mut registry);
    debug!(
        depth,
        nodes = nodes.len(),
        transformers = registry.len(),
        "grid topology built"
    );
    Grid::from_parts(nodes, root, registry)
}

fn build_level(
    levels: usize,
    nodes: &mut Vec<GridNode>,
    registry: &mut TransformerRegistry,
) -> Option<NodeId> {
    if levels == 0 {
        return None;
    }

    let tier = Tier::for_levels_remaining(levels);
    let id = NodeId(nodes.len() as u32 + 1);
    nodes.push(GridNode::new(tier, id));
    if tier == Tier::Transformer {
        registry.ids.push(id);
    }

    let left = build_level(levels - 1, nodes, registry);
    let right = build_level(levels - 1, nodes, registry);
    let node = &mut nodes[id.index()];
    node.left = left;
    node.right = right;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_empty() {
        let grid = build(0);
        assert!(grid.is_empty());
        assert!(grid.root().is_none());
        assert!(grid.transformers().is_empty());
    }

    #[test]
    fn depth_three_layout_is_preorder() {
        let grid = build(3);
        let tiers: Vec<(u32, Tier)> = grid.nodes().iter().map(|n| (n.id.0, n.tier)).collect();
        assert_eq!(
            tiers,
            vec![
                (1, Tier::MainGrid),
                (2, Tier::Substation),
                (3, Tier::Transformer),
                (4, Tier::Transformer),
                (5, Tier::Substation),
                (6, Tier::Transformer),
                (7, Tier::Transformer),
            ]
        );
        let root = grid.root_node().map(|n| (n.left, n.right));
        assert_eq!(root, Some((Some(NodeId(2)), Some(NodeId(5)))));
        assert_eq!(
            grid.transformers().ids(),
            &[NodeId(3), NodeId(4), NodeId(6), NodeId(7)]
        );
    }

    #[test]
    fn capacities_and_names_follow_tier() {
        let grid = build(3);
        let caps: Vec<u64> = grid.nodes().iter().map(|n| n.capacity).collect();
        assert_eq!(caps, vec![300, 200, 100, 100, 200, 100, 100]);
        assert_eq!(grid.nodes()[4].name, "Substation 5");
    }

    #[test]
    fn depth_one_is_single_transformer() {
        let grid = build(1);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.root_node().map(|n| n.tier), Some(Tier::Transformer));
        assert_eq!(grid.transformers().ids(), &[NodeId(1)]);
    }

    #[test]
    fn deeper_trees_have_full_node_count() {
        let grid = build(5);
        assert_eq!(grid.len(), 31);
        // 5, 4 and 1 levels remaining all map to transformer
        let transformers = grid
            .nodes()
            .iter()
            .filter(|n| n.tier == Tier::Transformer)
            .count();
        assert_eq!(transformers, grid.transformers().len());
        assert_eq!(grid.root_node().map(|n| n.tier), Some(Tier::Transformer));
    }
}
