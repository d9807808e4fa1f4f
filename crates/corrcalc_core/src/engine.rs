use tracing::debug;

use crate::config::{EngineConfig, KendallVariant};
use crate::correlation::{PearsonCorrelation, SpearmanCorrelation};
use crate::error::{CorrelationError, Result};
use crate::kendall::PairCounts;
use crate::numeric::Number;
use crate::ranking::rank;

/// The three coefficients for one pair of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationResult {
    pub label_x: String,
    pub label_y: String,
    pub observations: usize,
    pub pearson: Number,
    pub spearman: Number,
    pub kendall: Number,
    /// Variant that produced `kendall`
    pub kendall_variant: KendallVariant,
}

impl CorrelationResult {
    /// `(name, value)` for each coefficient, in reporting order.
    pub fn coefficients(&self) -> [(&'static str, Number); 3] {
        [
            ("Pearson", self.pearson),
            ("Spearman", self.spearman),
            ("Kendall", self.kendall),
        ]
    }
}

/// Stateless calculator; holds configuration only, so one instance can serve
/// any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CorrelationEngine {
    config: EngineConfig,
}

impl CorrelationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes Pearson, Spearman and Kendall's tau for the paired samples
    /// `(x[i], y[i])`.
    ///
    /// Both samples are ranked once; the moment pass runs on the raw values
    /// for Pearson and on the ranks for Spearman, and Kendall's tau is derived
    /// from the ranked pairs. Errors name the offending column by its label.
    pub fn calculate(
        &self,
        label_x: &str,
        x: &[Number],
        label_y: &str,
        y: &[Number],
    ) -> Result<CorrelationResult> {
        self.validate(x, y)?;
        self.compute(label_x, x, label_y, y)
            .map_err(|e| e.relabel(label_x, label_y))
    }

    fn validate(&self, x: &[Number], y: &[Number]) -> Result<()> {
        if x.len() != y.len() {
            return Err(CorrelationError::MismatchedLength {
                left: x.len(),
                right: y.len(),
            });
        }
        if x.is_empty() {
            return Err(CorrelationError::EmptyInput);
        }
        match self.config.max_observations {
            Some(limit) if x.len() > limit => Err(CorrelationError::TooManyObservations {
                observations: x.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn compute(
        &self,
        label_x: &str,
        x: &[Number],
        label_y: &str,
        y: &[Number],
    ) -> Result<CorrelationResult> {
        let sqrt = self.config.sqrt_config();
        let ranked_x = rank(x);
        let ranked_y = rank(y);

        let pearson = PearsonCorrelation::calculate(x, y, &sqrt)?;
        let spearman = SpearmanCorrelation::from_ranked(&ranked_x, &ranked_y, &sqrt)?;

        let counts = PairCounts::count(&ranked_x, &ranked_y, self.config.pair_counting);
        let kendall = self.config.kendall.coefficient(&counts, &sqrt)?;

        debug!(
            label_x,
            label_y,
            observations = x.len(),
            variant = self.config.kendall.name(),
            concordant = counts.concordant,
            discordant = counts.discordant,
            "correlation calculated"
        );

        Ok(CorrelationResult {
            label_x: label_x.to_string(),
            label_y: label_y.to_string(),
            observations: x.len(),
            pearson,
            spearman,
            kendall,
            kendall_variant: self.config.kendall,
        })
    }
}

/// [`CorrelationEngine::calculate`] with the default configuration
/// (tau-b, merge-sort pair counting, full-precision square roots).
pub fn calculate(label_x: &str, x: &[Number], label_y: &str, y: &[Number]) -> Result<CorrelationResult> {
    CorrelationEngine::default().calculate(label_x, x, label_y, y)
}
