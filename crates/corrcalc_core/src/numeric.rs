//! Fixed-point number type and the Newton square root behind every
//! coefficient denominator.
//!
//! Correlations close to ±1 are sensitive to rounding in `sqrt(Σdx²)`, so the
//! root is refined on the fixed-point value itself; `f64` only provides the
//! starting guess.

use fixed::types::I64F64;
use serde::{Deserialize, Serialize};

use crate::error::{CorrelationError, Result};

/// Engine number type: Q64.64 fixed point (~1e-19 resolution, |v| < 9.2e18).
pub type Number = I64F64;

/// Convergence settings for [`sqrt_newton`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqrtConfig {
    /// Stop once successive iterates differ by no more than this.
    /// 0 iterates until the value stops changing at Q64.64 resolution.
    pub epsilon: f64,
    /// Hard bound on Newton steps.
    pub max_iterations: u32,
}

impl Default for SqrtConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.0,
            max_iterations: 64,
        }
    }
}

impl SqrtConfig {
    fn epsilon_fixed(&self) -> Number {
        // NaN and negative tolerances mean "full precision"
        if !(self.epsilon > 0.0) {
            return Number::ZERO;
        }
        Number::checked_from_num(self.epsilon).unwrap_or(Number::MAX)
    }
}

/// Square root of `x` by Newton's method on the fixed-point value.
///
/// Seeds with `f64::sqrt`, then iterates `next = (prev + x / prev) / 2` until
/// two iterates are within `config.epsilon`. Truncating division can make the
/// iterates alternate between two neighbouring values one ulp apart; that
/// cycle also ends the loop, returning the lower of the two.
pub fn sqrt_newton(x: Number, config: &SqrtConfig) -> Result<Number> {
    if x.is_negative() {
        return Err(CorrelationError::NegativeRadicand);
    }
    if x == Number::ZERO {
        return Ok(Number::ZERO);
    }

    let epsilon = config.epsilon_fixed();
    let two = Number::from_num(2);
    let mut current = Number::checked_from_num(x.to_num::<f64>().sqrt())
        .ok_or_else(|| CorrelationError::overflow("square root seed"))?;
    let mut before_previous: Option<Number> = None;

    for _ in 0..config.max_iterations {
        let previous = current;
        if previous == Number::ZERO {
            return Ok(Number::ZERO);
        }

        current = x
            .checked_div(previous)
            .and_then(|quotient| previous.checked_add(quotient))
            .ok_or_else(|| CorrelationError::overflow("square root"))?
            / two;

        if (current - previous).abs() <= epsilon {
            return Ok(current);
        }
        if before_previous == Some(current) {
            return Ok(current.min(previous));
        }
        before_previous = Some(previous);
    }

    Ok(current)
}

/// Floor of log2 |x|, so `2^e <= |x| < 2^(e + 1)`. `None` for zero.
pub(crate) fn magnitude_exponent(x: Number) -> Option<i32> {
    let bits = x.to_bits().unsigned_abs();
    if bits == 0 {
        return None;
    }
    Some(127 - bits.leading_zeros() as i32 - Number::FRAC_NBITS as i32)
}

/// `x * 2^shift` on the raw bits. Left shifts are exact as long as the caller
/// keeps the result in range; right shifts truncate the low bits.
pub(crate) fn scale_by_pow2(x: Number, shift: i32) -> Number {
    let bits = x.to_bits();
    if shift >= 0 {
        Number::from_bits(bits << shift)
    } else {
        Number::from_bits(bits >> -shift)
    }
}

/// Rounding in the final division can land one ulp outside [-1, 1].
pub(crate) fn clamp_unit(r: Number) -> Number {
    r.clamp(-Number::ONE, Number::ONE)
}
