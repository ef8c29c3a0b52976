//! Pacing helpers for repeated queries.

use std::time::Duration;

/// Slowest supported query rate (one query per minute).
pub const MIN_HZ: f32 = 1.0 / 60.0;

/// Interval between query starts for a rate in Hz.
/// - Non-finite or too small rates are clamped to `MIN_HZ`.
/// - The interval is at least 1 ms.
#[inline]
pub fn interval_for_hz(hz: f32) -> Duration {
    let hz = if hz.is_finite() { hz.max(MIN_HZ) } else { MIN_HZ };
    Duration::from_secs_f32(1.0 / hz).max(Duration::from_millis(1))
}
