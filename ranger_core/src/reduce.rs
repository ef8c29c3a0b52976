//! Mode-with-median-fallback reducer.
//!
//! The scan walks runs of equal neighbours in the sorted set. `counter` is the
//! number of equal adjacent pairs in the current run (run length minus one),
//! so a value seen once contributes 0. A run becomes the mode candidate only
//! when it beats both the previous run and the best run so far. Any run whose
//! count equals the best count raises the bimodal flag, and that check also
//! runs for the run that has just become the best. A raised flag, or no
//! candidate at all, selects the median.
//!
//! The scan stops at `n - 1`; the final element is only ever looked at as the
//! right-hand neighbour of a comparison.

use tracing::debug;

use crate::sample::{Basis, DistanceEstimate, RawSample, ValidSampleSet};

/// Reduce a validated set to one estimate. Pure: equal input, equal output.
pub fn reduce(valid: &ValidSampleSet) -> DistanceEstimate {
    let s = valid.as_slice();
    let n = s.len();

    let mut max_count = 0usize;
    let mut mode: Option<RawSample> = None;
    let mut bimodal = false;
    let mut counter = 0usize;
    let mut index = 0usize;

    while index + 1 < n {
        let prev_count = counter;
        counter = 0;

        while index + 1 < n && s[index] == s[index + 1] {
            counter += 1;
            index += 1;
        }

        if counter > prev_count && counter > max_count {
            mode = Some(s[index]);
            max_count = counter;
            bimodal = false;
        }

        if counter == 0 {
            index += 1;
        }

        if counter == max_count {
            bimodal = true;
        }
    }

    match mode {
        Some(m) if !bimodal => {
            debug!(n, mode = m, max_count, "reduced via mode");
            DistanceEstimate::new(m, Basis::Mode)
        }
        _ => {
            let median = valid.median();
            debug!(n, ?mode, bimodal, median, "reduced via median");
            DistanceEstimate::new(median, Basis::Median)
        }
    }
}
