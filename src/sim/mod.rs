/// Command execution and batch runs over a grid.
pub mod engine;
/// Seeded demand generation.
pub mod generator;
pub mod kpi;
