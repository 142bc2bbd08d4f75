//! Load trend prediction from consumption history.

use crate::grid::ConsumptionHistory;

/// Number of most recent passes averaged for trend estimates.
pub const TREND_WINDOW: usize = 3;

/// Safety buffer applied on top of the recent average.
pub const TREND_BUFFER: f64 = 1.1;

/// Predicts the next pass's load as the recent average plus a 10% buffer.
///
/// # Examples
///
/// ```
/// use grid_balancer::forecast::predict_next_load;
/// use grid_balancer::grid::ConsumptionHistory;
///
/// let mut h = ConsumptionHistory::new();
/// h.record_load(100);
/// h.record_load(50);
/// h.record_load(60);
/// assert_eq!(predict_next_load(&h), 77); // round(70 * 1.1)
/// ```
pub fn predict_next_load(history: &ConsumptionHistory) -> u64 {
    (history.average_over_last(TREND_WINDOW) * TREND_BUFFER).round() as u64
}
