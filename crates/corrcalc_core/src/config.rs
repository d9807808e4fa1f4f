use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use clap::ValueEnum;

use crate::numeric::SqrtConfig;

/// Which normalization of Kendall's tau fills `CorrelationResult::kendall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum KendallVariant {
    /// (C - D) / n0, no tie adjustment
    TauA,
    /// (C - D) / sqrt((n0 - n1)(n0 - n2))
    #[default]
    TauB,
}

impl KendallVariant {
    pub fn name(self) -> &'static str {
        match self {
            KendallVariant::TauA => "tau-a",
            KendallVariant::TauB => "tau-b",
        }
    }
}

/// Algorithm used to classify the N(N-1)/2 observation pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum PairCounting {
    /// Visit every pair, O(N^2)
    Pairwise,
    /// Knight's merge-sort inversion count, O(N log N)
    #[default]
    MergeSort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kendall: KendallVariant,
    pub pair_counting: PairCounting,
    /// Newton square root tolerance (0 = full Q64.64 precision)
    pub sqrt_epsilon: f64,
    pub sqrt_max_iterations: u32,
    /// Reject inputs longer than this before doing any work
    pub max_observations: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let sqrt = SqrtConfig::default();
        Self {
            kendall: KendallVariant::TauB,
            pair_counting: PairCounting::MergeSort,
            sqrt_epsilon: sqrt.epsilon,
            sqrt_max_iterations: sqrt.max_iterations,
            max_observations: None,
        }
    }
}

impl EngineConfig {
    pub fn sqrt_config(&self) -> SqrtConfig {
        SqrtConfig {
            epsilon: self.sqrt_epsilon,
            max_iterations: self.sqrt_max_iterations,
        }
    }
}
