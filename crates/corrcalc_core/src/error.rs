use thiserror::Error;

/// Errors raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("series have different lengths ({left} vs {right})")]
    MismatchedLength { left: usize, right: usize },

    #[error("series are empty")]
    EmptyInput,

    /// A constant series (including any single observation) has no variance,
    /// so every coefficient is 0/0.
    #[error("series `{series}` has zero variance; the coefficient is undefined")]
    DegenerateVariance { series: String },

    #[error("cannot take the square root of a negative number")]
    NegativeRadicand,

    #[error("fixed-point overflow while computing {stage}")]
    Overflow { stage: &'static str },

    #[error("{observations} observations exceed the configured limit of {limit}")]
    TooManyObservations { observations: usize, limit: usize },
}

impl CorrelationError {
    pub(crate) fn degenerate(series: &str) -> Self {
        CorrelationError::DegenerateVariance {
            series: series.to_string(),
        }
    }

    pub(crate) fn overflow(stage: &'static str) -> Self {
        CorrelationError::Overflow { stage }
    }

    /// Replaces the positional `x`/`y` series names used by the low-level
    /// routines with the caller's column labels.
    pub fn relabel(self, label_x: &str, label_y: &str) -> Self {
        match self {
            CorrelationError::DegenerateVariance { series } if series == "x" => {
                Self::degenerate(label_x)
            }
            CorrelationError::DegenerateVariance { series } if series == "y" => {
                Self::degenerate(label_y)
            }
            other => other,
        }
    }
}

pub type Result<T> = core::result::Result<T, CorrelationError>;
