use std::{fs::File, io::BufReader, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::Error, plan::SeedBudget};

/// Parameters of a short-burst run. Every field has a default, so a config file
/// only needs the fields it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BurstConfig {
    pub num_districts: u32,
    /// Plans visited per burst, including its seed.
    pub burst_length: usize,
    pub num_bursts: usize,
    /// Relative population tolerance around the ideal.
    pub epsilon: f64,
    pub seed: u64,
    /// Cut edges may not exceed this multiple of the seed plan's cut edges.
    pub compactness_factor: f64,
    /// Minimum BVAP / VAP share of a majority-minority district.
    pub threshold: f64,
    pub population: String,
    pub vap: String,
    pub bvap: String,
    pub seed_attempts: usize,
    pub max_tree_attempts: usize,
    pub max_proposal_attempts: usize,
    pub require_contiguity: bool,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            num_districts: 14,
            burst_length: 5,
            num_bursts: 10,
            epsilon: 0.02,
            seed: 48,
            compactness_factor: 2.0,
            threshold: 0.5,
            population: "POPULATION".into(),
            vap: "VAP".into(),
            bvap: "BVAP".into(),
            seed_attempts: 10,
            max_tree_attempts: 10_000,
            max_proposal_attempts: 10_000,
            require_contiguity: true,
        }
    }
}

impl BurstConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { bail!(Error::InvalidConfig(msg)) };

        if self.num_districts == 0 { return invalid("num_districts must be at least 1".into()) }
        if self.burst_length == 0 { return invalid("burst_length must be at least 1".into()) }
        if !(0.0..1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon must be in [0, 1), got {}", self.epsilon))
        }
        if !(self.compactness_factor > 0.0) {
            return invalid(format!("compactness_factor must be positive, got {}", self.compactness_factor))
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return invalid(format!("threshold must be in (0, 1], got {}", self.threshold))
        }
        for (name, value) in [
            ("seed_attempts", self.seed_attempts),
            ("max_tree_attempts", self.max_tree_attempts),
            ("max_proposal_attempts", self.max_proposal_attempts),
        ] {
            if value == 0 { return invalid(format!("{name} must be at least 1")) }
        }
        Ok(())
    }

    /// Attempt budgets for building the seed plan.
    #[inline]
    pub fn seed_budget(&self) -> SeedBudget {
        SeedBudget { seed_attempts: self.seed_attempts, max_tree_attempts: self.max_tree_attempts }
    }

    /// Series that must be present on every node.
    pub fn series(&self) -> [&str; 3] { [self.population.as_str(), self.vap.as_str(), self.bvap.as_str()] }
}
