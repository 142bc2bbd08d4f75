//! Realized-load history for a single grid node.

use std::collections::VecDeque;

/// Append-only record of realized loads, newest first.
///
/// Storage is unbounded; queries take a lookback window.
#[derive(Debug, Clone, Default)]
pub struct ConsumptionHistory {
    entries: VecDeque<u64>,
}

impl ConsumptionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new most-recent load.
    pub fn record_load(&mut self, load: u64) {
        self.entries.push_front(load);
    }

    /// Mean of the most recent `min(n, len)` entries, or `0.0` when nothing applies.
    ///
    /// # Examples
    ///
    /// ```
    /// use grid_balancer::grid::ConsumptionHistory;
    ///
    /// let mut h = ConsumptionHistory::new();
    /// h.record_load(10);
    /// h.record_load(20);
    /// h.record_load(60);
    /// assert_eq!(h.average_over_last(2), 40.0);
    /// assert_eq!(h.average_over_last(10), 30.0);
    /// ```
    pub fn average_over_last(&self, n: usize) -> f64 {
        let count = n.min(self.entries.len());
        if count == 0 {
            return 0.0;
        }
        let sum: u64 = self.entries.iter().take(count).sum();
        sum as f64 / count as f64
    }

    /// Iterates recorded loads from newest to oldest.
    pub fn entries_newest_first(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
