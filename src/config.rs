//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

pub use crate::error::ConfigError;

/// Largest supported tree depth (2^10 - 1 nodes).
pub const MAX_DEPTH: usize = 10;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Tree shape.
    #[serde(default)]
    pub grid: GridConfig,
    /// Load report output.
    #[serde(default)]
    pub report: ReportConfig,
    /// Batch run length and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Generated demand for batch runs.
    #[serde(default)]
    pub demand: DemandConfig,
}

/// Tree shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of levels (3 = Main Grid → Substation → Transformer).
    pub depth: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { depth: 3 }
    }
}

/// Load report output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Whether each pass appends rows to the report file.
    pub enabled: bool,
    /// Report file path.
    pub path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "load_report.csv".to_string(),
        }
    }
}

/// Batch run length and seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of balancing passes in a batch run.
    pub steps: usize,
    /// Master random seed for generated demand.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { steps: 10, seed: 42 }
    }
}

/// Generated demand for batch runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Requests injected before every pass.
    pub requests_per_step: usize,
    /// Smallest request size (units, inclusive).
    pub min_units: u64,
    /// Largest request size (units, inclusive).
    pub max_units: u64,
    /// Probability that a generated request is critical (0.0–1.0).
    pub critical_ratio: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            requests_per_step: 4,
            min_units: 10,
            max_units: 120,
            critical_ratio: 0.25,
        }
    }
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "peak", "deep"];

    /// Returns the baseline scenario: a three-level grid with moderate demand.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the peak preset: heavy, frequently critical demand that overloads often.
    pub fn peak() -> Self {
        Self {
            simulation: SimulationConfig {
                steps: 20,
                ..SimulationConfig::default()
            },
            demand: DemandConfig {
                requests_per_step: 8,
                min_units: 40,
                max_units: 200,
                critical_ratio: 0.5,
            },
            ..Self::default()
        }
    }

    /// Returns the deep preset: a four-level grid with extra transformer layers.
    pub fn deep() -> Self {
        Self {
            grid: GridConfig { depth: 4 },
            demand: DemandConfig {
                requests_per_step: 6,
                ..DemandConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "peak" => Ok(Self::peak()),
            "deep" => Ok(Self::deep()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(1..=MAX_DEPTH).contains(&self.grid.depth) {
            errors.push(ConfigError::new(
                "grid.depth",
                format!("must be in [1, {MAX_DEPTH}], got {}", self.grid.depth),
            ));
        }

        if self.report.enabled && self.report.path.trim().is_empty() {
            errors.push(ConfigError::new(
                "report.path",
                "must not be empty when report.enabled = true",
            ));
        }

        let d = &self.demand;
        if d.min_units > d.max_units {
            errors.push(ConfigError::new(
                "demand.min_units",
                "must be <= demand.max_units",
            ));
        }
        if !(0.0..=1.0).contains(&d.critical_ratio) {
            errors.push(ConfigError::new(
                "demand.critical_ratio",
                "must be in [0.0, 1.0]",
            ));
        }

        errors
    }
}
