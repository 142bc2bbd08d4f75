//! Hierarchical electrical load balancing over a binary grid tree.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// Console rendering of the tree and node history.
pub mod display;
pub mod error;
pub mod forecast;
/// Grid tree, topology builder and load balancer.
pub mod grid;
pub mod io;
pub mod logging;
pub mod menu;
/// Simulation engine, demand generation and KPIs.
pub mod sim;
