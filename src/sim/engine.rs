//! Simulation engine that owns the grid and executes user commands.

use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::error::GridError;
use crate::grid::{BalanceOutcome, ConsumptionHistory, Grid, LoadExtremes, NodeId, topology};
use crate::io::report::ReportSink;

use super::generator::DemandGenerator;

/// Simulation engine owning the grid and the optional report sink.
///
/// Every command runs to completion before the next one is accepted.
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    report: Option<ReportSink>,
    passes: usize,
}

impl Simulation {
    /// Creates a simulation over a freshly built grid.
    pub fn new(grid: Grid, report: Option<ReportSink>) -> Self {
        Self {
            grid,
            report,
            passes: 0,
        }
    }

    /// Builds the grid and report sink described by a validated scenario.
    pub fn from_scenario(cfg: &ScenarioConfig) -> Self {
        let report = cfg
            .report
            .enabled
            .then(|| ReportSink::new(&cfg.report.path));
        Self::new(topology::build(cfg.grid.depth), report)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of balancing passes run so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn report(&self) -> Option<&ReportSink> {
        self.report.as_ref()
    }

    /// Queues demand on a node.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NodeNotFound`] for an unknown id.
    pub fn add_demand(&mut self, id: NodeId, units: u64, is_critical: bool) -> Result<(), GridError> {
        self.grid.enqueue_demand(id, units, is_critical)
    }

    /// Runs one balancing pass and appends its rows to the report.
    ///
    /// The grid is mutated even when the report write fails.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Report`] if the report file cannot be written.
    pub fn balance(&mut self) -> Result<BalanceOutcome, GridError> {
        let outcome = self.grid.balance();
        self.passes += 1;

        let overloads = outcome.overloads().count();
        info!(
            pass = self.passes,
            visited = outcome.visits.len(),
            overloads,
            dropped = outcome.dropped_units(),
            "balancing pass complete"
        );

        if let Some(sink) = &self.report {
            sink.append(&outcome.records).inspect_err(|e| {
                warn!(path = %sink.path().display(), error = %e, "failed to append load report");
            })?;
        }
        Ok(outcome)
    }

    /// History of one node.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NodeNotFound`] for an unknown id.
    pub fn history(&self, id: NodeId) -> Result<&ConsumptionHistory, GridError> {
        self.grid.history(id)
    }

    /// Active nodes with the highest and lowest current load.
    pub fn load_extremes(&self) -> Option<LoadExtremes> {
        self.grid.load_extremes()
    }

    /// Toggles power on a node and returns whether it is now active.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NodeNotFound`] for an unknown id.
    pub fn toggle_power(&mut self, id: NodeId) -> Result<bool, GridError> {
        self.grid.toggle_power(id)
    }

    /// Batch run: each step injects generated demand, then balances.
    ///
    /// # Errors
    ///
    /// Stops at the first report failure.
    pub fn run(
        &mut self,
        steps: usize,
        generator: &mut DemandGenerator,
    ) -> Result<Vec<BalanceOutcome>, GridError> {
        let mut outcomes = Vec::with_capacity(steps);
        for _ in 0..steps {
            for d in generator.next_step() {
                self.grid.enqueue_demand(d.node, d.units, d.is_critical)?;
            }
            outcomes.push(self.balance()?);
        }
        Ok(outcomes)
    }
}
