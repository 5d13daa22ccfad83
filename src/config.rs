/*!
# Analysis Configuration

[`AnalysisConfig`] is constructed once per run and passed by reference into every component.
Every field has a default, so a TOML file only needs to list what differs:
```
use mipgraphs::{config::AnalysisConfig, gens::GraphRepresentation};

let config: AnalysisConfig = toml::from_str(r#"
    representations = ["primal"]
    upper_bound = "greedy-fill-in"
    timeout_secs = 60
"#).unwrap();

assert_eq!(config.representations, vec![GraphRepresentation::Primal]);
assert_eq!(config.tree_depth_trials, 1000);
```
*/

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    gens::GraphRepresentation,
    lp::MpsFormat,
    width::{DEFAULT_TREE_DEPTH_TRIALS, LowerBoundAlgorithm, UpperBoundAlgorithm},
};

/// Which parts of the analysis run and under which limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Objective row participates in graph generation
    pub include_objective: bool,

    /// Graph representations generated per instance, in this order
    pub representations: Vec<GraphRepresentation>,

    /// Column layout of the input files
    pub mps_format: MpsFormat,

    pub treewidth: bool,
    pub torso_width: bool,
    pub tree_depth: bool,

    pub lower_bound: LowerBoundAlgorithm,
    pub upper_bound: UpperBoundAlgorithm,

    /// Random walks performed by the tree-depth heuristic
    pub tree_depth_trials: usize,

    /// Seed for the tree-depth heuristic; drawn from the OS if unset
    pub seed: Option<u64>,

    /// Wall-clock deadline per instance
    pub timeout_secs: u64,

    /// Time granted to a cancelled worker to stop
    pub shutdown_grace_secs: u64,

    /// Number of instances processed concurrently
    pub workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_objective: false,
            representations: GraphRepresentation::ALL.to_vec(),
            mps_format: MpsFormat::default(),
            treewidth: true,
            torso_width: true,
            tree_depth: true,
            lower_bound: LowerBoundAlgorithm::default(),
            upper_bound: UpperBoundAlgorithm::default(),
            tree_depth_trials: DEFAULT_TREE_DEPTH_TRIALS,
            seed: None,
            timeout_secs: 600,
            shutdown_grace_secs: 5,
            workers: 1,
        }
    }
}

impl AnalysisConfig {
    /// Loads a configuration from a TOML file; missing fields take their defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Returns *true* if any width parameter is requested
    pub fn computes_widths(&self) -> bool {
        self.treewidth || self.torso_width || self.tree_depth
    }
}
