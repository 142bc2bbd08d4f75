//! Priority-ordered pending demand for a single grid node.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use chrono::{DateTime, Local};
use serde::Serialize;

/// A single demand request queued on a node.
///
/// Requests are immutable once created. Ordering is total:
/// 1. larger `units` outrank smaller ones,
/// 2. on equal units, critical outranks non-critical,
/// 3. on a full tie, the older request (lower `seq`) outranks the newer one.
#[derive(Debug, Clone, Serialize)]
pub struct DemandRequest {
    /// Requested load in units.
    pub units: u64,
    /// Whether the request was flagged as critical.
    pub is_critical: bool,
    /// Wall-clock time the request was queued.
    pub timestamp: DateTime<Local>,
    /// Insertion counter within the owning queue.
    pub seq: u64,
}

impl Ord for DemandRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.units
            .cmp(&other.units)
            .then(self.is_critical.cmp(&other.is_critical))
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for DemandRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DemandRequest {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DemandRequest {}

/// Max-heap of pending [`DemandRequest`]s owned by one node.
///
/// Nothing is ever dropped implicitly: requests leave the queue only through
/// [`DemandQueue::pop`] or [`DemandQueue::dequeue_highest_priority`].
#[derive(Debug, Clone, Default)]
pub struct DemandQueue {
    heap: BinaryHeap<DemandRequest>,
    next_seq: u64,
}

impl DemandQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a new request stamped with the current local time.
    pub fn enqueue(&mut self, units: u64, is_critical: bool) {
        self.enqueue_at(units, is_critical, Local::now());
    }

    /// Queues a new request with an explicit timestamp.
    pub fn enqueue_at(&mut self, units: u64, is_critical: bool, timestamp: DateTime<Local>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(DemandRequest {
            units,
            is_critical,
            timestamp,
            seq,
        });
    }

    /// Removes and returns the highest-priority request.
    pub fn pop(&mut self) -> Option<DemandRequest> {
        self.heap.pop()
    }

    /// Removes the highest-priority request and returns its units.
    ///
    /// Returns `0` when the queue is empty. Zero-unit requests are legal, so
    /// callers that need to tell the two apart must check [`Self::is_empty`]
    /// first (or use [`Self::pop`]).
    pub fn dequeue_highest_priority(&mut self) -> u64 {
        self.pop().map_or(0, |d| d.units)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Sum of units over every pending request, saturating at `u64::MAX`.
    pub fn total_pending_units(&self) -> u64 {
        self.heap.iter().fold(0u64, |acc, d| acc.saturating_add(d.units))
    }

    /// Snapshot of every pending request, highest priority first.
    pub fn all_pending(&self) -> Vec<DemandRequest> {
        let mut all = self.heap.clone().into_sorted_vec();
        all.reverse();
        all
    }
}
