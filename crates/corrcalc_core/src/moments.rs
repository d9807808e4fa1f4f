use crate::error::{CorrelationError, Result};
use crate::numeric::{
    clamp_unit, magnitude_exponent, scale_by_pow2, sqrt_newton, Number, SqrtConfig,
};

/// First and second moments of a paired sample.
///
/// Q64.64 has a fixed absolute resolution, so the deviations of each series
/// are rescaled by a power of two before they are squared: the largest
/// deviation lands just below `2^((60 - bits(N)) / 2)`, which keeps the sums
/// of squares inside the type at full relative precision whatever the
/// magnitude of the data. The true second moments are
///
/// - `sqrt(Σ(xi - mean_x)²) = std_dev_x * 2^exponent_x`
/// - `Σ(xi - mean_x)(yi - mean_y) = covariance_sum * 2^(exponent_x + exponent_y)`
///
/// None of them is divided by N; the factor cancels in the Pearson ratio, and
/// so do the scale exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moments {
    pub mean_x: Number,
    pub mean_y: Number,
    /// sqrt(Σ dx²) of the rescaled deviations
    pub std_dev_x: Number,
    /// sqrt(Σ dy²) of the rescaled deviations
    pub std_dev_y: Number,
    /// Σ dx·dy of the rescaled deviations
    pub covariance_sum: Number,
    pub exponent_x: i32,
    pub exponent_y: i32,
}

impl Moments {
    /// Accumulates the moments of `(x[i], y[i])` in one pass over the
    /// centred series.
    ///
    /// Args:
    ///     x: First sample.
    ///     y: Second sample, paired index by index with `x`.
    ///     sqrt: Convergence settings for the two standard deviations.
    ///
    /// Returns:
    ///     Moments: means, rescaled second moments and their exponents.
    pub fn accumulate(x: &[Number], y: &[Number], sqrt: &SqrtConfig) -> Result<Self> {
        if x.len() != y.len() {
            return Err(CorrelationError::MismatchedLength {
                left: x.len(),
                right: y.len(),
            });
        }
        if x.is_empty() {
            return Err(CorrelationError::EmptyInput);
        }

        let cx = Centered::new(x)?;
        let cy = Centered::new(y)?;

        let (covariance_sum, squares_x, squares_y) = cx
            .deviations
            .iter()
            .zip(cy.deviations.iter())
            .try_fold(
                (Number::ZERO, Number::ZERO, Number::ZERO),
                |(cov, sx, sy), (&dx, &dy)| {
                    Some((
                        cov.checked_add(dx.checked_mul(dy)?)?,
                        sx.checked_add(dx.checked_mul(dx)?)?,
                        sy.checked_add(dy.checked_mul(dy)?)?,
                    ))
                },
            )
            .ok_or_else(|| CorrelationError::overflow("moment accumulation"))?;

        Ok(Self {
            mean_x: cx.mean,
            mean_y: cy.mean,
            std_dev_x: sqrt_newton(squares_x, sqrt)?,
            std_dev_y: sqrt_newton(squares_y, sqrt)?,
            covariance_sum,
            exponent_x: cx.exponent,
            exponent_y: cy.exponent,
        })
    }

    /// Pearson ratio `covariance_sum / (std_dev_x * std_dev_y)`.
    pub fn correlation(&self) -> Result<Number> {
        if self.std_dev_x == Number::ZERO {
            return Err(CorrelationError::degenerate("x"));
        }
        if self.std_dev_y == Number::ZERO {
            return Err(CorrelationError::degenerate("y"));
        }

        let denominator = self
            .std_dev_x
            .checked_mul(self.std_dev_y)
            .filter(|d| *d != Number::ZERO)
            .ok_or_else(|| CorrelationError::overflow("correlation denominator"))?;

        self.covariance_sum
            .checked_div(denominator)
            .map(clamp_unit)
            .ok_or_else(|| CorrelationError::overflow("correlation ratio"))
    }
}

/// One series minus its mean, deviations multiplied by `2^-exponent`.
struct Centered {
    mean: Number,
    deviations: Vec<Number>,
    exponent: i32,
}

impl Centered {
    fn new(values: &[Number]) -> Result<Self> {
        let first = values[0];
        if values.iter().all(|&v| v == first) {
            return Ok(Self {
                mean: first,
                deviations: vec![Number::ZERO; values.len()],
                exponent: 0,
            });
        }

        let n_bits = bit_length(values.len());
        // N * max|v| must stay below 2^63 for the sum behind the mean
        let headroom = values
            .iter()
            .filter_map(|&v| magnitude_exponent(v))
            .max()
            .map_or(0, |e| (e + n_bits - 62).max(0));
        let shifted: Vec<Number> = values.iter().map(|&v| scale_by_pow2(v, -headroom)).collect();
        let mean = mean(&shifted)?;

        let mut deviations = shifted
            .iter()
            .map(|&v| v.checked_sub(mean))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| CorrelationError::overflow("deviation"))?;
        let shift = deviations
            .iter()
            .filter_map(|&d| magnitude_exponent(d))
            .max()
            .map_or(0, |e| (60 - n_bits) / 2 - e);
        for d in deviations.iter_mut() {
            *d = scale_by_pow2(*d, shift);
        }

        Ok(Self {
            mean: scale_by_pow2(mean, headroom),
            deviations,
            exponent: headroom - shift,
        })
    }
}

/// Number of bits needed to hold `n`.
fn bit_length(n: usize) -> i32 {
    (usize::BITS - n.leading_zeros()) as i32
}

fn mean(values: &[Number]) -> Result<Number> {
    let total = values
        .iter()
        .try_fold(Number::ZERO, |acc, &v| acc.checked_add(v))
        .ok_or_else(|| CorrelationError::overflow("mean"))?;
    let count = Number::checked_from_num(values.len())
        .ok_or_else(|| CorrelationError::overflow("mean"))?;
    total
        .checked_div(count)
        .ok_or_else(|| CorrelationError::overflow("mean"))
}
