use crate::error::RangerResult;
use crate::filter::ValidRange;
use crate::reduce::reduce;
use crate::sample::{Measurement, SampleWindow};

/// Validation followed by reduction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    range: ValidRange,
}

impl Estimator {
    pub fn new(range: ValidRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> ValidRange {
        self.range
    }

    pub fn estimate(&self, window: &SampleWindow) -> RangerResult<Measurement> {
        let valid = self.range.filter(window)?;
        let estimate = reduce(&valid);
        Ok(Measurement {
            estimate,
            window_len: window.len(),
            valid_len: valid.len(),
        })
    }
}
