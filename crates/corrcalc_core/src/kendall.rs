//! Kendall rank correlation.
//!
//! Every unordered pair of observations (i, j) is classified by
//! `sign(x_j - x_i) * sign(y_j - y_i)`: +1 concordant, -1 discordant,
//! 0 when the pair is tied in x or in y. From those counts:
//!
//! - tau-a = (C - D) / n0
//! - tau-b = (C - D) / sqrt((n0 - n1)(n0 - n2))
//!
//! with n0 = N(N-1)/2 and n1, n2 the pairs tied in x and in y respectively.
//!
//! Two counting strategies produce identical [`PairCounts`]: a direct visit of
//! all pairs, and Knight's (1966) merge-sort variant which counts discordant
//! pairs as inversions of the y sequence after sorting by (x, y).

use tracing::trace;

use crate::config::{KendallVariant, PairCounting};
use crate::error::{CorrelationError, Result};
use crate::numeric::{clamp_unit, sqrt_newton, Number, SqrtConfig};
use crate::ranking::{rank, RankedDatum};

/// Pair classification totals for one paired sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairCounts {
    pub concordant: u64,
    pub discordant: u64,
    /// n1: pairs with equal x
    pub tied_x: u64,
    /// n2: pairs with equal y
    pub tied_y: u64,
    /// n0: N(N-1)/2
    pub total: u64,
}

impl PairCounts {
    /// C - D
    pub fn score(&self) -> i64 {
        self.concordant as i64 - self.discordant as i64
    }

    pub fn count(x: &[RankedDatum], y: &[RankedDatum], method: PairCounting) -> Self {
        let counts = match method {
            PairCounting::Pairwise => Self::pairwise(x, y),
            PairCounting::MergeSort => Self::merge_sort(x, y),
        };
        trace!(?method, ?counts, "classified observation pairs");
        counts
    }

    /// Visits every pair after ordering observations by (x rank, y rank).
    pub fn pairwise(x: &[RankedDatum], y: &[RankedDatum]) -> Self {
        let mut pairs: Vec<(RankedDatum, RankedDatum)> =
            x.iter().copied().zip(y.iter().copied()).collect();
        pairs.sort_unstable_by(|a, b| (a.0.rank, a.1.rank).cmp(&(b.0.rank, b.1.rank)));

        let mut counts = PairCounts {
            total: pair_count(pairs.len() as u64),
            ..Default::default()
        };

        for (i, (xi, yi)) in pairs.iter().enumerate() {
            for (xj, yj) in &pairs[i + 1..] {
                if xj.value == xi.value {
                    counts.tied_x += 1;
                }
                if yj.value == yi.value {
                    counts.tied_y += 1;
                }
                // x is sorted, so xj >= xi and only y decides the sign
                if xj.rank == xi.rank || yj.rank == yi.rank {
                    continue;
                }
                if yj.rank > yi.rank {
                    counts.concordant += 1;
                } else {
                    counts.discordant += 1;
                }
            }
        }

        counts
    }

    /// Knight's algorithm.
    ///
    /// After sorting by (x, y), a strict inversion in the y sequence can only
    /// come from a pair with distinct x, so the inversion count is D. C then
    /// follows from n0 - n1 - n2 + n3 - D, n3 being the pairs tied in both.
    pub fn merge_sort(x: &[RankedDatum], y: &[RankedDatum]) -> Self {
        let mut pairs: Vec<(Number, Number)> = x
            .iter()
            .zip(y.iter())
            .map(|(xi, yi)| (xi.rank, yi.rank))
            .collect();
        pairs.sort_unstable();

        let total = pair_count(pairs.len() as u64);
        let tied_x = tied_pairs(pairs.iter().map(|p| p.0));
        let tied_xy = tied_pairs(pairs.iter().copied());

        let mut ys: Vec<Number> = pairs.iter().map(|p| p.1).collect();
        let discordant = count_inversions(&mut ys);
        // ys is sorted now
        let tied_y = tied_pairs(ys.iter().copied());

        PairCounts {
            concordant: total + tied_xy - tied_x - tied_y - discordant,
            discordant,
            tied_x,
            tied_y,
            total,
        }
    }
}

/// Kendall's tau for two raw samples.
pub struct KendallTau;

impl KendallTau {
    /// Ranks both samples, classifies every pair and normalizes the score.
    ///
    /// Args:
    ///     x: First sample.
    ///     y: Second sample, paired index by index with `x`.
    ///     variant: tau-a or tau-b normalization.
    ///     method: Pair counting algorithm; both give the same counts.
    ///     sqrt: Convergence settings for the tau-b denominator.
    ///
    /// Returns:
    ///     Number: Kendall's tau in [-1, 1].
    pub fn calculate(
        x: &[Number],
        y: &[Number],
        variant: KendallVariant,
        method: PairCounting,
        sqrt: &SqrtConfig,
    ) -> Result<Number> {
        if x.len() != y.len() {
            return Err(CorrelationError::MismatchedLength {
                left: x.len(),
                right: y.len(),
            });
        }
        if x.is_empty() {
            return Err(CorrelationError::EmptyInput);
        }
        let counts = PairCounts::count(&rank(x), &rank(y), method);
        variant.coefficient(&counts, sqrt)
    }
}

impl KendallVariant {
    pub fn coefficient(self, counts: &PairCounts, sqrt: &SqrtConfig) -> Result<Number> {
        match self {
            KendallVariant::TauA => tau_a(counts),
            KendallVariant::TauB => tau_b(counts, sqrt),
        }
    }
}

/// (C - D) / n0
pub fn tau_a(counts: &PairCounts) -> Result<Number> {
    if counts.total == 0 {
        return Err(CorrelationError::degenerate("x"));
    }
    Number::from_num(counts.score())
        .checked_div(Number::from_num(counts.total))
        .map(clamp_unit)
        .ok_or_else(|| CorrelationError::overflow("kendall tau-a"))
}

/// (C - D) / sqrt((n0 - n1)(n0 - n2)).
///
/// When the product of the radicands leaves Q64.64 the root is taken as
/// sqrt(n0 - n1) * sqrt(n0 - n2) instead.
pub fn tau_b(counts: &PairCounts, sqrt: &SqrtConfig) -> Result<Number> {
    let untied_x = counts.total - counts.tied_x;
    let untied_y = counts.total - counts.tied_y;
    if untied_x == 0 {
        return Err(CorrelationError::degenerate("x"));
    }
    if untied_y == 0 {
        return Err(CorrelationError::degenerate("y"));
    }

    let overflow = || CorrelationError::overflow("kendall tau-b denominator");
    let left = Number::checked_from_num(untied_x).ok_or_else(overflow)?;
    let right = Number::checked_from_num(untied_y).ok_or_else(overflow)?;
    let denominator = match left.checked_mul(right) {
        Some(product) => sqrt_newton(product, sqrt)?,
        None => sqrt_newton(left, sqrt)?
            .checked_mul(sqrt_newton(right, sqrt)?)
            .ok_or_else(overflow)?,
    };

    Number::from_num(counts.score())
        .checked_div(denominator)
        .map(clamp_unit)
        .ok_or_else(|| CorrelationError::overflow("kendall tau-b"))
}

fn pair_count(n: u64) -> u64 {
    n * n.saturating_sub(1) / 2
}

/// Σ k(k-1)/2 over runs of equal, adjacent items.
fn tied_pairs<T: PartialEq>(sorted: impl IntoIterator<Item = T>) -> u64 {
    let mut total = 0;
    let mut run = 0u64;
    let mut last: Option<T> = None;
    for item in sorted {
        if last.as_ref() == Some(&item) {
            run += 1;
        } else {
            total += pair_count(run);
            run = 1;
            last = Some(item);
        }
    }
    total + pair_count(run)
}

/// Sorts `values` ascending and returns the number of pairs i < j with
/// values[i] > values[j]. Bottom-up merge sort; equal values are not inversions.
fn count_inversions(values: &mut Vec<Number>) -> u64 {
    let n = values.len();
    let mut buffer = values.clone();
    let mut inversions = 0u64;
    let mut width = 1;

    while width < n {
        for start in (0..n).step_by(2 * width) {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            inversions += merge(&values[start..mid], &values[mid..end], &mut buffer[start..end]);
        }
        core::mem::swap(values, &mut buffer);
        width *= 2;
    }

    inversions
}

fn merge(left: &[Number], right: &[Number], out: &mut [Number]) -> u64 {
    let (mut i, mut j) = (0, 0);
    let mut inversions = 0u64;
    for slot in out.iter_mut() {
        if j == right.len() || (i < left.len() && left[i] <= right[j]) {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
            inversions += (left.len() - i) as u64;
        }
    }
    inversions
}
