//! Type-state builder for the rangefinders.
//!
//! `build_wired()` / `build_wireless()` are only available once a pin was set;
//! `try_build_*` are always available and report a missing pin dynamically.
//! The capture device is opened last, after every other check passed, so a
//! failed build never holds a pin.

use std::marker::PhantomData;

use ranger_traits::clock::{Clock, MonotonicClock};
use ranger_traits::{CaptureBoard, RadioLink};
use tracing::{info, warn};

use crate::acquire::PulseAcquirer;
use crate::cancel::CancelToken;
use crate::config::{DEFAULT_SAMPLE_NUM, Timeouts, ValidRange};
use crate::error::{BuildError, RangerError, Result};
use crate::estimator::Estimator;
use crate::rangefinder::{WiredRangefinder, WirelessRangefinder};

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `WiredRangefinder` and `WirelessRangefinder`.
pub struct RangefinderBuilder<B, C, P> {
    board: B,
    clock: C,
    pin: Option<u8>,
    sample_num: usize,
    range: ValidRange,
    timeouts: Timeouts,
    cancel: CancelToken,
    _p: PhantomData<P>,
}

impl<B: CaptureBoard> RangefinderBuilder<B, MonotonicClock, Missing> {
    pub fn new(board: B) -> Self {
        Self {
            board,
            clock: MonotonicClock::new(),
            pin: None,
            sample_num: DEFAULT_SAMPLE_NUM,
            range: ValidRange::default(),
            timeouts: Timeouts::default(),
            cancel: CancelToken::new(),
            _p: PhantomData,
        }
    }
}

impl<B: CaptureBoard> RangefinderBuilder<B, MonotonicClock, Set> {
    /// Pin, sample count, valid range and timeouts from a loaded config.
    pub fn from_config(board: B, cfg: &ranger_config::Config) -> Self {
        RangefinderBuilder::new(board)
            .with_pin(cfg.sensor.pin)
            .with_sample_num(cfg.sensor.sample_num)
            .with_valid_range((&cfg.sensor).into())
            .with_timeouts((&cfg.timeouts).into())
    }
}

impl<B: CaptureBoard, C: Clock, P> RangefinderBuilder<B, C, P> {
    pub fn with_pin(self, pin: u8) -> RangefinderBuilder<B, C, Set> {
        RangefinderBuilder {
            board: self.board,
            clock: self.clock,
            pin: Some(pin),
            sample_num: self.sample_num,
            range: self.range,
            timeouts: self.timeouts,
            cancel: self.cancel,
            _p: PhantomData,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> RangefinderBuilder<B, C2, P> {
        RangefinderBuilder {
            board: self.board,
            clock,
            pin: self.pin,
            sample_num: self.sample_num,
            range: self.range,
            timeouts: self.timeouts,
            cancel: self.cancel,
            _p: PhantomData,
        }
    }

    pub fn with_sample_num(mut self, sample_num: usize) -> Self {
        self.sample_num = sample_num;
        self
    }

    pub fn with_valid_range(mut self, range: ValidRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Token checked by both waits; cancel it to abort a blocked query.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn check(&self) -> Result<u8> {
        let pin = self.pin.ok_or(BuildError::MissingPin)?;
        if self.sample_num == 0 {
            return Err(BuildError::InvalidConfig("sample_num must be >= 1").into());
        }
        if self.range.min_mm > self.range.max_mm {
            return Err(BuildError::InvalidConfig("valid range min must be <= max").into());
        }
        self.timeouts.validate().map_err(BuildError::InvalidConfig)?;
        Ok(pin)
    }

    fn open(self, pin: u8) -> Result<WiredRangefinder<B::Capture, C>> {
        let capture = self
            .board
            .open_pulse_in(pin, self.sample_num)
            .map_err(|e| RangerError::Device(format!("pin {pin}: {e}")))?;
        let acquirer = PulseAcquirer::new(capture, self.sample_num, &self.timeouts, self.clock);
        Ok(WiredRangefinder::new(
            acquirer,
            Estimator::new(self.range),
            self.cancel,
        ))
    }

    pub fn try_build_wired(self) -> Result<WiredRangefinder<B::Capture, C>> {
        let pin = self.check()?;
        let sample_num = self.sample_num;
        let rf = self.open(pin)?;
        info!(pin, sample_num, wireless = false, "rangefinder ready");
        Ok(rf)
    }

    /// Like `try_build_wired`, then starts advertising on `radio`.
    /// Advertising failures are logged, not returned.
    pub fn try_build_wireless<R: RadioLink>(
        self,
        mut radio: R,
    ) -> Result<WirelessRangefinder<B::Capture, R, C>> {
        let pin = self.check()?;
        let sample_num = self.sample_num;
        let timeouts = self.timeouts;
        let inner = self.open(pin)?;
        if let Err(e) = radio.start_advertising() {
            warn!(error = %e, "advertising failed; continuing");
        }
        info!(pin, sample_num, wireless = true, "rangefinder ready");
        Ok(WirelessRangefinder::new(inner, radio, &timeouts))
    }
}

impl<B: CaptureBoard, C: Clock> RangefinderBuilder<B, C, Set> {
    pub fn build_wired(self) -> Result<WiredRangefinder<B::Capture, C>> {
        self.try_build_wired()
    }

    pub fn build_wireless<R: RadioLink>(
        self,
        radio: R,
    ) -> Result<WirelessRangefinder<B::Capture, R, C>> {
        self.try_build_wireless(radio)
    }
}
