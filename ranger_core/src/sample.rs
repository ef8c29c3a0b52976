//! Value types flowing through the pipeline.
//!
//! All of them are created per query and returned by value; nothing here is
//! kept between queries.

use std::fmt;

/// One pulse width as captured, in microseconds (1 µs ≙ 1 mm on this sensor).
pub type RawSample = u16;

/// Readings of one acquisition burst, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleWindow(Vec<RawSample>);

impl SampleWindow {
    pub fn new(raw: Vec<RawSample>) -> Self {
        Self(raw)
    }

    pub fn as_slice(&self) -> &[RawSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RawSample>> for SampleWindow {
    fn from(raw: Vec<RawSample>) -> Self {
        Self::new(raw)
    }
}

/// Readings that passed range validation: never empty, always sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSampleSet(Vec<RawSample>);

#[allow(clippy::len_without_is_empty)]
impl ValidSampleSet {
    /// Sort `samples` into a set; `None` when there is nothing to sort.
    pub fn from_samples(mut samples: Vec<RawSample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_unstable();
        Some(Self(samples))
    }

    pub fn as_slice(&self) -> &[RawSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Element at `len / 2`: the middle for odd lengths, upper-middle for even.
    pub fn median(&self) -> RawSample {
        self.0[self.0.len() / 2]
    }
}

/// Which branch of the reducer produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Mode,
    Median,
}

impl Basis {
    pub fn as_str(self) -> &'static str {
        match self {
            Basis::Mode => "mode",
            Basis::Median => "median",
        }
    }
}

/// Distance in millimetres, no unit conversion applied to the raw width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceEstimate {
    mm: RawSample,
    basis: Basis,
}

impl DistanceEstimate {
    pub(crate) fn new(mm: RawSample, basis: Basis) -> Self {
        Self { mm, basis }
    }

    pub fn millimeters(&self) -> RawSample {
        self.mm
    }

    /// Same value as `millimeters`, for callers that report decimals.
    pub fn as_f32(&self) -> f32 {
        f32::from(self.mm)
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }
}

impl fmt::Display for DistanceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.mm)
    }
}

/// An estimate plus the bookkeeping of the window it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub estimate: DistanceEstimate,
    /// Readings acquired (always `sample_num`).
    pub window_len: usize,
    /// Readings that passed range validation.
    pub valid_len: usize,
}
