//! Scenario runner for batch underwriting runs
//!
//! Holds one projection config and applies it to many deals, or applies many
//! configs to one deal. Runs are independent and execute in parallel.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::assumptions::{load_assumptions, Assumptions};
use crate::error::Result;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Outcome of projecting one assumptions file
#[derive(Debug)]
pub struct FileRun {
    pub path: PathBuf,
    pub result: Result<ProjectionResult>,
}

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let results = runner.run_batch(&deals);
///
/// // Sensitivity on sale costs for one deal
/// let configs: Vec<_> = [0.01, 0.02, 0.03]
///     .iter()
///     .map(|&rate| ProjectionConfig { sale_cost_rate: rate, ..Default::default() })
///     .collect();
/// let results = runner.run_scenarios(&deal, &configs);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Runner with default projection config
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, assumptions: &Assumptions) -> ProjectionResult {
        self.engine.project(assumptions)
    }

    /// Run many deals with the same config; results keep input order
    pub fn run_batch(&self, deals: &[Assumptions]) -> Vec<ProjectionResult> {
        info!("Running batch of {} deals", deals.len());
        deals.par_iter().map(|deal| self.engine.project(deal)).collect()
    }

    /// Run one deal under several configs; results keep config order
    pub fn run_scenarios(
        &self,
        assumptions: &Assumptions,
        configs: &[ProjectionConfig],
    ) -> Vec<ProjectionResult> {
        configs
            .par_iter()
            .map(|config| ProjectionEngine::new(config.clone()).project(assumptions))
            .collect()
    }

    /// Load and run each file; a bad file fails only its own run
    pub fn run_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<FileRun> {
        paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                let result = load_assumptions(path).map(|deal| self.engine.project(&deal));
                if let Err(e) = &result {
                    warn!("Skipping {}: {}", path.display(), e);
                }
                FileRun {
                    path: path.to_path_buf(),
                    result,
                }
            })
            .collect()
    }
}
