//! Post-hoc KPI computation from balancing outcomes.

use std::fmt;

use serde::Serialize;

use crate::grid::{BalanceOutcome, Grid, TransferKind};

/// Aggregate indicators derived from a sequence of balancing passes.
///
/// Computed post-hoc from the pass outcomes plus the final grid state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GridKpi {
    /// Number of balancing passes.
    pub passes: usize,
    /// Node visits that ended in an overload.
    pub overload_events: usize,
    /// Excess units pushed down to children.
    pub units_to_children: u64,
    /// Excess units redirected to peer transformers.
    pub units_redirected: u64,
    /// Excess units that found no target.
    pub units_dropped: u64,
    /// Highest realized load seen on any node in any pass.
    pub peak_load: u64,
    /// Lowest health score in the final grid.
    pub min_health: i32,
    /// Nodes switched off at the end of the run.
    pub inactive_nodes: usize,
}

impl GridKpi {
    /// Computes all KPIs from pass outcomes and the final grid.
    pub fn from_outcomes(outcomes: &[BalanceOutcome], grid: &Grid) -> Self {
        let mut kpi = Self {
            passes: outcomes.len(),
            min_health: grid.nodes().iter().map(|n| n.health_score).min().unwrap_or(0),
            inactive_nodes: grid.nodes().iter().filter(|n| !n.is_active).count(),
            ..Self::default()
        };

        for outcome in outcomes {
            kpi.overload_events += outcome.overloads().count();
            kpi.units_to_children = kpi
                .units_to_children
                .saturating_add(outcome.transferred_units(TransferKind::Child));
            kpi.units_redirected = kpi
                .units_redirected
                .saturating_add(outcome.transferred_units(TransferKind::Peer));
            kpi.units_dropped = kpi.units_dropped.saturating_add(outcome.dropped_units());
            let peak = outcome.visits.iter().map(|v| v.current_load).max();
            kpi.peak_load = kpi.peak_load.max(peak.unwrap_or(0));
        }

        kpi
    }
}

impl fmt::Display for GridKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Grid KPI Report ---")?;
        writeln!(f, "Balancing passes: {}", self.passes)?;
        writeln!(f, "Overload events: {}", self.overload_events)?;
        writeln!(f, "Units shifted to children: {}", self.units_to_children)?;
        writeln!(f, "Units redirected to peers: {}", self.units_redirected)?;
        writeln!(f, "Units dropped: {}", self.units_dropped)?;
        writeln!(f, "Peak node load: {} units", self.peak_load)?;
        writeln!(f, "Minimum health: {}%", self.min_health)?;
        write!(f, "Inactive nodes: {}", self.inactive_nodes)
    }
}
