//! # corrcalc_core
//!
//! Pearson, Spearman and Kendall's tau between two paired numeric series,
//! computed in Q64.64 fixed point.
//!
//! ## Modules
//!
//! - [`ranking`]: tie-corrected (mid) ranks
//! - [`moments`]: means, covariance sum and standard deviations of a pair
//! - [`numeric`]: the [`Number`] type and the Newton square root
//! - [`correlation`]: Pearson and Spearman
//! - [`kendall`]: pair counting, tau-a and tau-b
//! - [`engine`]: all three coefficients in one call
//!
//! ```
//! use corrcalc_core::{calculate, Number};
//!
//! let x: Vec<Number> = (1..=10).map(Number::from_num).collect();
//! let y: Vec<Number> = (1..=10).rev().map(Number::from_num).collect();
//!
//! let result = calculate("up", &x, "down", &y).unwrap();
//! assert!((result.kendall.to_num::<f64>() + 1.0).abs() < 1e-12);
//! ```
//!
//! The engine keeps no state between calls. Inputs are validated up front:
//! unequal lengths and empty series are errors, and a constant series
//! (including a single observation) is reported as degenerate instead of
//! producing 0/0.

pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod kendall;
pub mod moments;
pub mod numeric;
pub mod ranking;


pub use config::{EngineConfig, KendallVariant, PairCounting};
pub use correlation::{PearsonCorrelation, SpearmanCorrelation};
pub use engine::{calculate, CorrelationEngine, CorrelationResult};
pub use error::{CorrelationError, Result};
pub use kendall::{tau_a, tau_b, KendallTau, PairCounts};
pub use moments::Moments;
pub use numeric::{sqrt_newton, Number, SqrtConfig};
pub use ranking::{rank, RankedDatum};
