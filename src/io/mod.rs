//! File output for balancing passes.

/// Append-only CSV load report.
pub mod report;
