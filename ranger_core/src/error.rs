use std::fmt;

use thiserror::Error;

/// Which bounded wait gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPoint {
    /// Waiting for the capture buffer to hold `sample_num` pulses.
    Pulses,
    /// Waiting for the wireless link to connect.
    Link,
}

impl fmt::Display for WaitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitPoint::Pulses => f.write_str("sensor pulses"),
            WaitPoint::Link => f.write_str("wireless link"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangerError {
    #[error("capture device error: {0}")]
    Device(String),
    #[error("none of the {window} readings were in the {min_mm}mm to {max_mm}mm range")]
    NoValidReadings {
        window: usize,
        min_mm: u16,
        max_mm: u16,
    },
    #[error("timeout waiting for {0}")]
    Timeout(WaitPoint),
    #[error("cancelled while waiting for {0}")]
    Cancelled(WaitPoint),
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("link error: {0}")]
    Link(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing sensor pin")]
    MissingPin,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Result of a single query or pipeline stage.
pub type RangerResult<T> = std::result::Result<T, RangerError>;

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
