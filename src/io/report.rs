//! Append-only CSV audit trail of balancing passes.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReportError;
use crate::grid::LoadRecord;

/// Column header for the load report.
pub const HEADER: &str = "node_name,tier,node_id,capacity,current_load,\
                          avg_load_3,health_score,request_timestamp";

/// ctime-style layout used for request timestamps.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Writes report rows as CSV to any writer.
///
/// # Arguments
///
/// * `records` - Rows captured during one balancing pass
/// * `writer` - Destination implementing `Write`
/// * `with_header` - Whether to emit the header row first
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_records(
    records: &[LoadRecord],
    writer: impl Write,
    with_header: bool,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    if with_header {
        wtr.write_record(HEADER.split(',').map(str::trim))?;
    }

    for r in records {
        wtr.write_record(&[
            r.node_name.clone(),
            r.tier.label().to_string(),
            r.node_id.to_string(),
            r.capacity.to_string(),
            r.current_load.to_string(),
            format!("{:.2}", r.avg_load),
            r.health_score.to_string(),
            r.requested_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Report file that is opened, appended to and closed once per pass.
#[derive(Debug, Clone)]
pub struct ReportSink {
    path: PathBuf,
}

impl ReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends rows to the report, writing the header first if the file is new or empty.
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` if the file cannot be opened or written.
    pub fn append(&self, records: &[LoadRecord]) -> Result<(), ReportError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let with_header = file.metadata()?.len() == 0;
        let buf = io::BufWriter::new(file);
        write_records(records, buf, with_header)?;
        debug!(path = %self.path.display(), rows = records.len(), "report rows appended");
        Ok(())
    }
}
