//! Seeded demand generation for batch runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DemandConfig;
use crate::grid::NodeId;

/// One generated request, not yet queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedDemand {
    pub node: NodeId,
    pub units: u64,
    pub is_critical: bool,
}

/// Draws demand requests against uniformly chosen nodes.
///
/// Identical seed, node count and config produce identical sequences.
#[derive(Debug, Clone)]
pub struct DemandGenerator {
    config: DemandConfig,
    node_count: u32,
    rng: StdRng,
}

impl DemandGenerator {
    /// Creates a generator for a grid of `node_count` nodes.
    pub fn new(config: DemandConfig, node_count: usize, seed: u64) -> Self {
        Self {
            config,
            node_count: node_count as u32,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws the requests for one step. Empty when the grid has no nodes.
    pub fn next_step(&mut self) -> Vec<GeneratedDemand> {
        if self.node_count == 0 {
            return Vec::new();
        }
        (0..self.config.requests_per_step)
            .map(|_| GeneratedDemand {
                node: NodeId(self.rng.random_range(1..=self.node_count)),
                units: self
                    .rng
                    .random_range(self.config.min_units..=self.config.max_units),
                is_critical: self.rng.random_bool(self.config.critical_ratio),
            })
            .collect()
    }
}
