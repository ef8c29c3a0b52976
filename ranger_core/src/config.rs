//! Runtime configuration types.
//!
//! Separate from the TOML schema in `ranger_config`; see `conversions` for the
//! mapping.

use std::time::Duration;

pub use crate::filter::ValidRange;

/// Readings per acquisition burst when nothing else is configured.
pub const DEFAULT_SAMPLE_NUM: usize = ranger_config::DEFAULT_SAMPLE_NUM;

/// Bounds for the two blocking waits of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Max wait for the capture buffer to fill.
    pub acquire: Duration,
    /// Max wait for the wireless link (wireless rangefinder only).
    pub connect: Duration,
    /// Poll interval of both waits.
    pub poll: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            acquire: Duration::from_secs(5),
            connect: Duration::from_secs(30),
            poll: Duration::from_micros(500),
        }
    }
}

impl Timeouts {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.acquire.is_zero() {
            return Err("acquire timeout must be > 0");
        }
        if self.connect.is_zero() {
            return Err("connect timeout must be > 0");
        }
        if self.poll.is_zero() {
            return Err("poll interval must be > 0");
        }
        Ok(())
    }
}
