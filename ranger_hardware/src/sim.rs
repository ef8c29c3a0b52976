//! Simulated board, pulse capture and radio link.
//!
//! Pulses "arrive" at a fixed period measured on the injected clock, so with a
//! virtual clock a whole acquisition runs instantly and deterministically.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ranger_traits::{BoxError, CaptureBoard, Clock, PulseCapture, RadioLink};
use tracing::{debug, trace};

use crate::error::HwError;

/// Pins exposed by the simulated board (BCM numbering of a 40-pin header).
pub const SIM_PINS: RangeInclusive<u8> = 0..=27;
/// HRLV-EZ free-running pulse rate.
pub const SIM_PULSE_PERIOD: Duration = Duration::from_millis(100);

/// Simulated board handing out pulse-capture lines.
///
/// All captures opened from one board replay the same reading script and
/// share a cursor, so consecutive acquisitions continue where the last
/// one stopped.
pub struct SimulatedBoard<C> {
    pins: RangeInclusive<u8>,
    claimed: Rc<RefCell<BTreeSet<u8>>>,
    clock: C,
    pulse_period: Duration,
    script: Rc<[u16]>,
    cursor: Rc<Cell<usize>>,
}

impl<C: Clock + Clone> SimulatedBoard<C> {
    pub fn new(clock: C) -> Self {
        Self {
            pins: SIM_PINS,
            claimed: Rc::new(RefCell::new(BTreeSet::new())),
            clock,
            pulse_period: SIM_PULSE_PERIOD,
            script: Rc::from(vec![1000u16]),
            cursor: Rc::new(Cell::new(0)),
        }
    }

    /// Readings replayed in order (cycling). An empty script models a sensor
    /// that never pulses.
    pub fn with_readings(mut self, readings: Vec<u16>) -> Self {
        self.script = Rc::from(readings);
        self.cursor.set(0);
        self
    }

    pub fn with_pulse_period(mut self, period: Duration) -> Self {
        self.pulse_period = period.max(Duration::from_micros(1));
        self
    }

    pub fn with_pins(mut self, pins: RangeInclusive<u8>) -> Self {
        self.pins = pins;
        self
    }

    /// Whether a capture currently holds `pin`.
    pub fn is_claimed(&self, pin: u8) -> bool {
        self.claimed.borrow().contains(&pin)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.borrow().len()
    }

    fn claim(&self, pin: u8) -> Result<PinClaim, HwError> {
        if !self.pins.contains(&pin) {
            return Err(HwError::PinUnavailable(pin));
        }
        if !self.claimed.borrow_mut().insert(pin) {
            return Err(HwError::PinBusy(pin));
        }
        Ok(PinClaim {
            pin,
            claimed: Rc::clone(&self.claimed),
        })
    }
}

impl<C: Clock + Clone> CaptureBoard for SimulatedBoard<C> {
    type Capture = SimulatedPulseCapture<C>;

    fn open_pulse_in(&self, pin: u8, capacity: usize) -> Result<Self::Capture, BoxError> {
        if capacity == 0 {
            return Err(Box::new(HwError::ZeroCapacity));
        }
        let claim = self.claim(pin)?;
        debug!(pin, capacity, "simulated pulse capture opened");
        Ok(SimulatedPulseCapture {
            claim,
            clock: self.clock.clone(),
            period_us: self.pulse_period.as_micros().max(1),
            script: Rc::clone(&self.script),
            cursor: Rc::clone(&self.cursor),
            capacity,
            buffer: RefCell::new(Vec::with_capacity(capacity)),
            active_since: Cell::new(None),
            arrived: Cell::new(0),
        })
    }
}

/// Releases the pin when the capture is dropped.
struct PinClaim {
    pin: u8,
    claimed: Rc<RefCell<BTreeSet<u8>>>,
}

impl Drop for PinClaim {
    fn drop(&mut self) {
        self.claimed.borrow_mut().remove(&self.pin);
    }
}

pub struct SimulatedPulseCapture<C> {
    claim: PinClaim,
    clock: C,
    period_us: u128,
    script: Rc<[u16]>,
    cursor: Rc<Cell<usize>>,
    capacity: usize,
    buffer: RefCell<Vec<u16>>,
    active_since: Cell<Option<Instant>>,
    /// Pulses emitted since the last resume, buffered or not.
    arrived: Cell<u128>,
}

impl<C: Clock> SimulatedPulseCapture<C> {
    pub fn pin(&self) -> u8 {
        self.claim.pin
    }

    pub fn is_active(&self) -> bool {
        self.active_since.get().is_some()
    }

    /// Move every pulse due by now into the buffer. Pulses arriving while the
    /// buffer is full are lost, like on the real line.
    fn sync(&self) {
        let Some(since) = self.active_since.get() else {
            return;
        };
        if self.script.is_empty() {
            return;
        }
        let due = self.clock.now().saturating_duration_since(since).as_micros() / self.period_us;
        let mut buf = self.buffer.borrow_mut();
        let mut arrived = self.arrived.get();
        while arrived < due {
            let at = self.cursor.get();
            self.cursor.set(at.wrapping_add(1));
            if buf.len() < self.capacity {
                let raw = self.script[at % self.script.len()];
                trace!(pin = self.claim.pin, raw, "simulated pulse");
                buf.push(raw);
            }
            arrived += 1;
        }
        self.arrived.set(arrived);
    }
}

impl<C: Clock> PulseCapture for SimulatedPulseCapture<C> {
    fn clear(&mut self) -> Result<(), BoxError> {
        self.sync();
        self.buffer.borrow_mut().clear();
        Ok(())
    }

    fn resume(&mut self) -> Result<(), BoxError> {
        if self.active_since.get().is_none() {
            self.active_since.set(Some(self.clock.now()));
            self.arrived.set(0);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), BoxError> {
        self.sync();
        self.active_since.set(None);
        Ok(())
    }

    fn len(&self) -> usize {
        self.sync();
        self.buffer.borrow().len()
    }

    fn get(&self, index: usize) -> Option<u16> {
        self.sync();
        self.buffer.borrow().get(index).copied()
    }
}

/// Frames handed to a `SimulatedRadio`, shared with the test that created it.
pub type SentFrames = Rc<RefCell<Vec<Vec<u8>>>>;

/// Radio link that connects after a fixed number of `is_connected` polls.
#[derive(Debug, Default)]
pub struct SimulatedRadio {
    connect_after: Option<u32>,
    polls: u32,
    advertising: bool,
    fail_advertising: bool,
    sent: SentFrames,
}

impl SimulatedRadio {
    /// A central is already connected.
    pub fn connected() -> Self {
        Self::connect_after(0)
    }

    pub fn connect_after(polls: u32) -> Self {
        Self {
            connect_after: Some(polls),
            ..Self::default()
        }
    }

    pub fn never_connected() -> Self {
        Self::default()
    }

    /// Make `start_advertising` fail.
    pub fn failing_advertising(mut self) -> Self {
        self.fail_advertising = true;
        self
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    pub fn sent_frames(&self) -> SentFrames {
        Rc::clone(&self.sent)
    }
}

impl RadioLink for SimulatedRadio {
    fn start_advertising(&mut self) -> Result<(), BoxError> {
        if self.fail_advertising {
            return Err(Box::new(HwError::Io(std::io::Error::other(
                "advertising rejected",
            ))));
        }
        self.advertising = true;
        debug!("simulated radio advertising");
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        let Some(after) = self.connect_after else {
            return false;
        };
        let connected = self.polls >= after;
        self.polls = self.polls.saturating_add(1);
        connected
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), BoxError> {
        if self.connect_after.is_none_or(|after| self.polls < after) {
            return Err(Box::new(HwError::NotConnected));
        }
        self.sent.borrow_mut().push(bytes.to_vec());
        Ok(())
    }
}
