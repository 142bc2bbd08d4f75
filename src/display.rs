//! Plain-text projections of grid state for the console.

use std::fmt::Write;

use crate::forecast::predict_next_load;
use crate::grid::{ConsumptionHistory, Grid, NodeId};

/// Renders the tree with box-drawing guides, one node per line.
///
/// # Examples
///
/// ```
/// use grid_balancer::display::render_tree;
/// use grid_balancer::grid::topology;
///
/// let tree = render_tree(&topology::build(2));
/// assert!(tree.starts_with("├── Substation 1 (Substation, 0/200 units, Health: 100%)"));
/// assert_eq!(tree.lines().count(), 3);
/// ```
pub fn render_tree(grid: &Grid) -> String {
    let mut out = String::new();
    if let Some(root) = grid.root() {
        render_node(grid, root, "", true, &mut out);
    }
    out
}

fn render_node(grid: &Grid, id: NodeId, prefix: &str, is_left: bool, out: &mut String) {
    let Some(node) = grid.node(id) else {
        return;
    };
    let branch = if is_left { "├── " } else { "└── " };
    let _ = write!(
        out,
        "{prefix}{branch}{} ({}, {}/{} units, Health: {}%)",
        node.name, node.tier, node.current_load, node.capacity, node.health_score
    );
    if !node.is_active {
        out.push_str(" [OFF]");
    }
    out.push('\n');

    let child_prefix = format!("{prefix}{}", if is_left { "│   " } else { "    " });
    if let Some(left) = node.left {
        render_node(grid, left, &child_prefix, true, out);
    }
    if let Some(right) = node.right {
        render_node(grid, right, &child_prefix, false, out);
    }
}

/// Lists history newest first (`Day 1` is the latest pass) with the trend prediction.
pub fn render_history(history: &ConsumptionHistory) -> String {
    if history.is_empty() {
        return "No load history recorded yet.\n".to_string();
    }
    let mut out = String::new();
    for (day, load) in history.entries_newest_first().enumerate() {
        let _ = writeln!(out, "Day {}: {load} units", day + 1);
    }
    let _ = writeln!(out, "Predicted next load: {} units", predict_next_load(history));
    out
}
