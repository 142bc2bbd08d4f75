//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Hierarchical electrical load balancer simulator.
///
/// Runs a batch of balancing passes with generated demand, or an interactive
/// menu with `--interactive`.
#[derive(Parser, Debug)]
#[command(name = "grid-balancer")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Load scenario from a TOML config file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, peak, deep)
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the number of grid levels
    #[arg(long)]
    pub depth: Option<usize>,

    /// Override the demand generator seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of batch balancing passes
    #[arg(long)]
    pub steps: Option<usize>,

    /// Write the load report to this path
    #[arg(long, conflicts_with = "no_report")]
    pub report: Option<PathBuf>,

    /// Disable the load report
    #[arg(long)]
    pub no_report: bool,

    /// Run the interactive menu on stdin instead of a batch
    #[arg(short, long)]
    pub interactive: bool,

    /// Log filter directive (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Serve the final grid state over HTTP after a batch run
    #[cfg(feature = "api")]
    #[arg(long, conflicts_with = "interactive")]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
