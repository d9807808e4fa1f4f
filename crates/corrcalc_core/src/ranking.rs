//! Tie-corrected ranking.
//!
//! Every observation gets the 1-based position of its value in an ascending
//! sort. Equal values share the mean of the positions they jointly occupy, so
//! `[5, 5, 1]` ranks as `[2.5, 2.5, 1]` and the ranks of N observations
//! always sum to N(N+1)/2.

use crate::numeric::Number;

/// An observation paired with its tie-corrected rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedDatum {
    pub value: Number,
    pub rank: Number,
}

/// Ranks `sample`, keeping input order (the output is not sorted).
pub fn rank(sample: &[Number]) -> Vec<RankedDatum> {
    let mut sorted = sample.to_vec();
    sorted.sort_unstable();

    sample
        .iter()
        .map(|&value| {
            let first = sorted.partition_point(|&s| s < value);
            let past_last = sorted.partition_point(|&s| s <= value);
            RankedDatum {
                value,
                rank: tie_corrected_rank(first + 1, past_last - first),
            }
        })
        .collect()
}

/// Just the ranks, in input order.
pub fn ranks_of(ranked: &[RankedDatum]) -> Vec<Number> {
    ranked.iter().map(|datum| datum.rank).collect()
}

/// Mean of the `tied` consecutive ranks starting at `provisional`:
/// (k*r + k(k-1)/2) / k = r + (k-1)/2, evaluated as (2r + k - 1) / 2.
fn tie_corrected_rank(provisional: usize, tied: usize) -> Number {
    Number::from_num(2 * provisional + tied - 1) / Number::from_num(2)
}
