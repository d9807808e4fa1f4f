use anyhow::{Context, Result};
use clap::Args;
use corrcalc_core::{EngineConfig, KendallVariant, PairCounting};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::report::ReportConfig;

/// Settings read from `--config <file>`; every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Loads the TOML file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Engine flags; anything given here wins over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Kendall normalization reported as the Kendall coefficient
    #[arg(long, value_enum, global = true)]
    pub kendall: Option<KendallVariant>,

    /// Pair counting algorithm for Kendall's tau
    #[arg(long, value_enum, global = true)]
    pub pair_counting: Option<PairCounting>,

    /// Newton square root tolerance (0 = full precision)
    #[arg(long, global = true)]
    pub sqrt_epsilon: Option<f64>,

    /// Refuse columns with more rows than this
    #[arg(long, global = true)]
    pub max_observations: Option<usize>,
}

impl EngineArgs {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(kendall) = self.kendall {
            config.kendall = kendall;
        }
        if let Some(pair_counting) = self.pair_counting {
            config.pair_counting = pair_counting;
        }
        if let Some(epsilon) = self.sqrt_epsilon {
            config.sqrt_epsilon = epsilon;
        }
        if self.max_observations.is_some() {
            config.max_observations = self.max_observations;
        }
    }
}
