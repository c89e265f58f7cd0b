//! Immutable configuration threaded through `AcoEngine::new`. Loaded from an
//! optional TOML file with CLI overrides applied on top (see `bin/aco_sched.rs`);
//! gated behind the `config-file` feature so the core library stays free of
//! an unconditional `serde` dependency.

#[cfg(feature = "config-file")]
use std::path::Path;

use crate::error::SchedError;

/// Tiebreaker consulted by `should_replace` when two schedules tie on their
/// primary cost.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DualCostFn {
    Off,
    GlobalOnly,
    GlobalAndTighten,
    GlobalAndIteration,
}

impl DualCostFn {
    /// Parses the config-file string form, mirroring the original's
    /// `ParseDCFOpt`. Unknown values are a configuration error, not a panic.
    pub fn parse(s: &str) -> Result<Self, SchedError> {
        match s {
            "off" => Ok(Self::Off),
            "global_only" => Ok(Self::GlobalOnly),
            "global_and_tighten" => Ok(Self::GlobalAndTighten),
            "global_and_iteration" => Ok(Self::GlobalAndIteration),
            other => Err(SchedError::ConfigurationInvalid(format!(
                "unknown dual_cost_fn option: {other}"
            ))),
        }
    }
}

/// Pheromone reinforcement/decay strategy. The original project compiles one
/// or the other via a `USE_ACS` macro; this crate exposes it as a runtime
/// switch so a single binary supports both.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PheromoneStrategy {
    Mmas,
    Acs,
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub ants_per_iteration_p1: u32,
    pub ants_per_iteration_p2: u32,
    pub stop_iterations: u32,
    pub use_fixed_bias: bool,
    pub fixed_bias: f64,
    pub bias_ratio: f64,
    pub use_tournament: bool,
    pub heuristic_importance: bool,
    pub pheromone_strategy: PheromoneStrategy,
    pub local_decay: bool,
    pub decay_factor: f64,
    pub dual_cost_fn: DualCostFn,
    pub use_two_pass: bool,
    pub aco_trace: bool,
    pub dbg_regions: bool,
    pub seed: u64,
    pub deadline_ms: u64,
    pub min_p: f64,
    pub max_p: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ants_per_iteration_p1: 10,
            ants_per_iteration_p2: 10,
            stop_iterations: 50,
            use_fixed_bias: false,
            fixed_bias: 0.0,
            bias_ratio: 0.1,
            use_tournament: false,
            heuristic_importance: true,
            pheromone_strategy: PheromoneStrategy::Mmas,
            local_decay: false,
            decay_factor: 0.1,
            dual_cost_fn: DualCostFn::Off,
            use_two_pass: false,
            aco_trace: false,
            dbg_regions: false,
            seed: 0,
            deadline_ms: 1000,
            min_p: 1.0,
            max_p: 8.0,
        }
    }
}

#[cfg(feature = "config-file")]
impl Config {
    /// Reads a TOML file, falling back to [`Config::default`] for any key
    /// the file doesn't set (`#[serde(default)]` on every field).
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SchedError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SchedError::ConfigurationInvalid(format!(
                "reading {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SchedError> {
        toml::from_str(text).map_err(|e| SchedError::ConfigurationInvalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_dcf_options() {
        assert_eq!(DualCostFn::parse("off").unwrap(), DualCostFn::Off);
        assert_eq!(
            DualCostFn::parse("global_only").unwrap(),
            DualCostFn::GlobalOnly
        );
    }

    #[test]
    fn rejects_unknown_dcf_option() {
        assert!(DualCostFn::parse("bogus").is_err());
    }

    #[test]
    fn default_config_is_sane() {
        let cfg = Config::default();
        assert!(cfg.min_p < cfg.max_p);
        assert!(cfg.ants_per_iteration_p1 > 0);
    }
}
