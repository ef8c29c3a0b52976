//! Range validation of raw pulse widths.

use ranger_config::{DEFAULT_MAX_VALID_MM, DEFAULT_MIN_VALID_MM};
use tracing::trace;

use crate::error::{RangerError, RangerResult};
use crate::sample::{RawSample, SampleWindow, ValidSampleSet};

/// Inclusive band of physically plausible readings.
///
/// Defaults come from the HRLV-EZ datasheet (300–5000 mm) with the lower
/// bound raised to 301: a reading of 300 means "closer than the minimum" and
/// was observed to leak through as 301.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRange {
    pub min_mm: RawSample,
    pub max_mm: RawSample,
}

impl Default for ValidRange {
    fn default() -> Self {
        Self {
            min_mm: DEFAULT_MIN_VALID_MM,
            max_mm: DEFAULT_MAX_VALID_MM,
        }
    }
}

impl ValidRange {
    pub fn new(min_mm: RawSample, max_mm: RawSample) -> Self {
        Self { min_mm, max_mm }
    }

    #[inline]
    pub fn contains(&self, raw: RawSample) -> bool {
        (self.min_mm..=self.max_mm).contains(&raw)
    }

    /// Keep the readings inside the band, sorted.
    ///
    /// Fails with `NoValidReadings` instead of returning an empty set.
    pub fn filter(&self, window: &SampleWindow) -> RangerResult<ValidSampleSet> {
        let kept: Vec<RawSample> = window
            .as_slice()
            .iter()
            .enumerate()
            .filter_map(|(i, &raw)| {
                let valid = self.contains(raw);
                trace!(index = i, raw, valid, "pulse");
                valid.then_some(raw)
            })
            .collect();

        ValidSampleSet::from_samples(kept).ok_or(RangerError::NoValidReadings {
            window: window.len(),
            min_mm: self.min_mm,
            max_mm: self.max_mm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let r = ValidRange::default();
        assert!(!r.contains(300));
        assert!(r.contains(301));
        assert!(r.contains(5000));
        assert!(!r.contains(5001));
    }

    #[test]
    fn filter_drops_out_of_range_and_sorts() {
        let w = SampleWindow::new(vec![65535, 900, 120, 450, 5001, 450]);
        let set = ValidRange::default().filter(&w).unwrap();
        assert_eq!(set.as_slice(), &[450, 450, 900]);
    }

    #[test]
    fn filter_fails_when_nothing_survives() {
        let w = SampleWindow::new(vec![300, 299, 5001, 65535]);
        let err = ValidRange::default().filter(&w).unwrap_err();
        assert_eq!(
            err,
            RangerError::NoValidReadings {
                window: 4,
                min_mm: 301,
                max_mm: 5000
            }
        );
    }
}
