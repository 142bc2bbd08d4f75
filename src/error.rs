//! Error types shared across the grid, report and configuration layers.

use std::io;

use crate::grid::NodeId;

/// Failures surfaced by grid commands.
///
/// Balancing itself is total; only id lookups and report output can fail.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// No node with the requested id exists in the tree.
    #[error("node {id} not found")]
    NodeNotFound { id: NodeId },

    /// The balancing pass completed but its report rows could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Failures while appending rows to the load report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("report CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"grid.depth"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
