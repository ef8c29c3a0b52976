//! Pulse acquisition: one burst of `sample_num` readings per call.

use std::time::Duration;

use ranger_traits::{Clock, PulseCapture};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::Timeouts;
use crate::error::{RangerError, RangerResult, WaitPoint};
use crate::hw_error::map_hw_error;
use crate::sample::SampleWindow;
use crate::wait::wait_until;

/// Owns the capture device exclusively; `&mut self` on `acquire` rules out
/// overlapping bursts.
pub struct PulseAcquirer<P, C> {
    capture: P,
    sample_num: usize,
    timeout: Duration,
    poll: Duration,
    clock: C,
}

impl<P: PulseCapture, C: Clock> PulseAcquirer<P, C> {
    pub fn new(capture: P, sample_num: usize, timeouts: &Timeouts, clock: C) -> Self {
        Self {
            capture,
            sample_num,
            timeout: timeouts.acquire,
            poll: timeouts.poll,
            clock,
        }
    }

    pub fn sample_num(&self) -> usize {
        self.sample_num
    }

    pub fn capture(&self) -> &P {
        &self.capture
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn poll(&self) -> Duration {
        self.poll
    }

    /// Clear, resume, wait for `sample_num` readings, pause, read them out.
    ///
    /// The device is paused again on every exit path once it was resumed.
    pub fn acquire(&mut self, cancel: &CancelToken) -> RangerResult<SampleWindow> {
        let n = self.sample_num;
        self.capture.clear().map_err(|e| map_hw_error(e.as_ref()))?;
        self.capture.resume().map_err(|e| map_hw_error(e.as_ref()))?;

        let capture = &self.capture;
        let waited = wait_until(
            &self.clock,
            || capture.len() >= n,
            self.timeout,
            self.poll,
            cancel,
            WaitPoint::Pulses,
        );
        let paused = self.capture.pause().map_err(|e| map_hw_error(e.as_ref()));
        if let (Err(wait_err), Err(pause_err)) = (&waited, &paused) {
            warn!(%wait_err, %pause_err, "capture could not be paused after failed wait");
        }
        waited?;
        paused?;

        let raw = (0..n)
            .map(|i| self.capture.get(i))
            .collect::<Option<Vec<u16>>>()
            .ok_or_else(|| {
                RangerError::Hardware(format!(
                    "capture held {} readings after pause, expected {n}",
                    self.capture.len()
                ))
            })?;
        debug!(sample_num = n, "acquired pulse window");
        Ok(SampleWindow::new(raw))
    }
}
