//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use grid_balancer::config::DemandConfig;
use grid_balancer::grid::{Grid, GridNode, NodeId, topology};
use grid_balancer::sim::engine::Simulation;
use grid_balancer::sim::generator::DemandGenerator;

/// Default three-level grid (1 main grid, 2 substations, 4 transformers).
pub fn default_grid() -> Grid {
    topology::build(3)
}

/// Simulation over the default grid with no report file.
pub fn default_simulation() -> Simulation {
    Simulation::new(default_grid(), None)
}

/// Generator with default demand settings for a grid of `nodes` nodes.
pub fn default_generator(nodes: usize, seed: u64) -> DemandGenerator {
    DemandGenerator::new(DemandConfig::default(), nodes, seed)
}

/// Heavy demand that overloads most nodes every pass.
pub fn heavy_generator(nodes: usize, seed: u64) -> DemandGenerator {
    let config = DemandConfig {
        requests_per_step: 10,
        min_units: 50,
        max_units: 250,
        critical_ratio: 0.5,
    };
    DemandGenerator::new(config, nodes, seed)
}

/// Node by id, panicking with a readable message if absent.
pub fn node(grid: &Grid, id: u32) -> &GridNode {
    grid.node(NodeId(id))
        .unwrap_or_else(|| panic!("node {id} should exist"))
}

/// `(current_load, health_score, history)` for comparing frozen state.
pub fn snapshot(grid: &Grid, id: u32) -> (u64, i32, Vec<u64>) {
    let n = node(grid, id);
    (
        n.current_load,
        n.health_score,
        n.history.entries_newest_first().collect(),
    )
}
