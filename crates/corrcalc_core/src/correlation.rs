use crate::error::Result;
use crate::moments::Moments;
use crate::numeric::{Number, SqrtConfig};
use crate::ranking::{rank, ranks_of, RankedDatum};

/// Pearson product-moment correlation between two paired samples.
pub struct PearsonCorrelation;

impl PearsonCorrelation {
    /// Calculates the Pearson correlation coefficient between two samples.
    ///
    /// Returns a value between -1 (perfect inverse correlation) and 1 (perfect
    /// correlation). Fails when the samples differ in length, are empty, or
    /// either one is constant.
    ///
    /// Args:
    ///     x: First sample.
    ///     y: Second sample, paired index by index with `x`.
    ///     sqrt: Convergence settings for the standard deviations.
    ///
    /// Returns:
    ///     Number: The correlation coefficient.
    pub fn calculate(x: &[Number], y: &[Number], sqrt: &SqrtConfig) -> Result<Number> {
        Moments::accumulate(x, y, sqrt)?.correlation()
    }
}

/// Spearman rank correlation: Pearson applied to tie-corrected ranks.
pub struct SpearmanCorrelation;

impl SpearmanCorrelation {
    pub fn calculate(x: &[Number], y: &[Number], sqrt: &SqrtConfig) -> Result<Number> {
        Self::from_ranked(&rank(x), &rank(y), sqrt)
    }

    /// Same as [`calculate`](Self::calculate) for samples that are already ranked.
    pub fn from_ranked(x: &[RankedDatum], y: &[RankedDatum], sqrt: &SqrtConfig) -> Result<Number> {
        PearsonCorrelation::calculate(&ranks_of(x), &ranks_of(y), sqrt)
    }
}
