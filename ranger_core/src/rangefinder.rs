//! The two rangefinder variants and their shared query interface.

use ranger_traits::{Clock, PulseCapture, RadioLink};
use tracing::{debug, info};

use crate::acquire::PulseAcquirer;
use crate::cancel::CancelToken;
use crate::config::Timeouts;
use crate::error::{RangerResult, WaitPoint};
use crate::estimator::Estimator;
use crate::hw_error::map_link_error;
use crate::sample::{DistanceEstimate, Measurement};
use crate::wait::wait_until;

/// Anything that answers "how far is the object?".
pub trait DistanceSource {
    /// Acquire a fresh window and reduce it.
    fn measure(&mut self) -> RangerResult<Measurement>;

    fn distance(&mut self) -> RangerResult<DistanceEstimate> {
        self.measure().map(|m| m.estimate)
    }
}

impl<D: DistanceSource + ?Sized> DistanceSource for Box<D> {
    fn measure(&mut self) -> RangerResult<Measurement> {
        (**self).measure()
    }
}

/// Rangefinder without a wireless link.
pub struct WiredRangefinder<P, C> {
    acquirer: PulseAcquirer<P, C>,
    estimator: Estimator,
    cancel: CancelToken,
}

impl<P: PulseCapture, C: Clock> WiredRangefinder<P, C> {
    pub(crate) fn new(acquirer: PulseAcquirer<P, C>, estimator: Estimator, cancel: CancelToken) -> Self {
        Self {
            acquirer,
            estimator,
            cancel,
        }
    }

    pub fn capture(&self) -> &P {
        self.acquirer.capture()
    }

    pub fn sample_num(&self) -> usize {
        self.acquirer.sample_num()
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl<P: PulseCapture, C: Clock> DistanceSource for WiredRangefinder<P, C> {
    fn measure(&mut self) -> RangerResult<Measurement> {
        let window = self.acquirer.acquire(&self.cancel)?;
        let m = self.estimator.estimate(&window)?;
        info!(
            distance_mm = m.estimate.millimeters(),
            basis = m.estimate.basis().as_str(),
            valid = m.valid_len,
            window = m.window_len,
            "distance"
        );
        Ok(m)
    }
}

/// Rangefinder that waits for a connected link before each query and
/// forwards every estimate to it as an ASCII line.
pub struct WirelessRangefinder<P, R, C> {
    inner: WiredRangefinder<P, C>,
    radio: R,
    connect_timeout: std::time::Duration,
}

impl<P: PulseCapture, R: RadioLink, C: Clock> WirelessRangefinder<P, R, C> {
    pub(crate) fn new(inner: WiredRangefinder<P, C>, radio: R, timeouts: &Timeouts) -> Self {
        Self {
            inner,
            radio,
            connect_timeout: timeouts.connect,
        }
    }

    pub fn capture(&self) -> &P {
        self.inner.capture()
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn sample_num(&self) -> usize {
        self.inner.sample_num()
    }
}

/// Wire format of one estimate on the link.
pub fn encode_line(estimate: &DistanceEstimate) -> String {
    format!("{}\n", estimate.millimeters())
}

impl<P: PulseCapture, R: RadioLink, C: Clock> DistanceSource for WirelessRangefinder<P, R, C> {
    fn measure(&mut self) -> RangerResult<Measurement> {
        debug!("waiting for wireless link");
        let radio = &mut self.radio;
        wait_until(
            self.inner.acquirer.clock(),
            || radio.is_connected(),
            self.connect_timeout,
            self.inner.acquirer.poll(),
            &self.inner.cancel,
            WaitPoint::Link,
        )?;

        let m = self.inner.measure()?;
        self.radio
            .send(encode_line(&m.estimate).as_bytes())
            .map_err(|e| map_link_error(e.as_ref()))?;
        Ok(m)
    }
}
