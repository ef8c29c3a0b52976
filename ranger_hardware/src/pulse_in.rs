use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use ranger_traits::{BoxError, CaptureBoard, PulseCapture};
use rppal::gpio::{Gpio, InputPin, Level, Trigger};
use tracing::{debug, trace};

use crate::error::{HwError, Result};

/// Raspberry Pi GPIO controller handing out pulse-width capture lines.
pub struct RppalBoard {
    gpio: Gpio,
}

impl RppalBoard {
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(format!("open gpio: {e}")))?;
        Ok(Self { gpio })
    }
}

impl CaptureBoard for RppalBoard {
    type Capture = GpioPulseIn;

    fn open_pulse_in(&self, pin: u8, capacity: usize) -> std::result::Result<GpioPulseIn, BoxError> {
        Ok(GpioPulseIn::open(&self.gpio, pin, capacity)?)
    }
}

struct EdgeState {
    rise: Option<Instant>,
    readings: VecDeque<u16>,
}

struct Shared {
    active: AtomicBool,
    capacity: usize,
    state: Mutex<EdgeState>,
}

/// Interrupt-driven pulse-width capture on one input pin.
///
/// Widths are measured between a rising and the next falling edge in whole
/// microseconds, saturating at `u16::MAX`. When the buffer is full the oldest
/// reading is overwritten.
pub struct GpioPulseIn {
    // Dropping the pin clears the interrupt and releases the line.
    pin: InputPin,
    shared: Arc<Shared>,
}

impl GpioPulseIn {
    pub fn open(gpio: &Gpio, pin: u8, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HwError::ZeroCapacity);
        }
        let mut input = gpio
            .get(pin)
            .map_err(|e| HwError::Gpio(format!("open pin {pin}: {e}")))?
            .into_input();

        let shared = Arc::new(Shared {
            active: AtomicBool::new(false),
            capacity,
            state: Mutex::new(EdgeState {
                rise: None,
                readings: VecDeque::with_capacity(capacity),
            }),
        });
        let cb_shared = Arc::clone(&shared);
        input
            .set_async_interrupt(Trigger::Both, move |level: Level| {
                on_edge(&cb_shared, level);
            })
            .map_err(|e| HwError::Gpio(format!("interrupt on pin {pin}: {e}")))?;
        debug!(pin, capacity, "gpio pulse capture opened");
        Ok(Self { pin: input, shared })
    }

    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

fn on_edge(shared: &Shared, level: Level) {
    if !shared.active.load(Ordering::Acquire) {
        return;
    }
    let now = Instant::now();
    let Ok(mut st) = shared.state.lock() else {
        return;
    };
    match level {
        Level::High => st.rise = Some(now),
        Level::Low => {
            if let Some(rise) = st.rise.take() {
                let us = now.saturating_duration_since(rise).as_micros();
                let width = u16::try_from(us).unwrap_or(u16::MAX);
                if st.readings.len() == shared.capacity {
                    st.readings.pop_front();
                }
                st.readings.push_back(width);
                trace!(width, "pulse");
            }
        }
    }
}

impl PulseCapture for GpioPulseIn {
    fn clear(&mut self) -> std::result::Result<(), BoxError> {
        let mut st = self
            .shared
            .state
            .lock()
            .map_err(|_| HwError::Gpio("pulse buffer poisoned".into()))?;
        st.readings.clear();
        st.rise = None;
        Ok(())
    }

    fn resume(&mut self) -> std::result::Result<(), BoxError> {
        self.shared.active.store(true, Ordering::Release);
        Ok(())
    }

    fn pause(&mut self) -> std::result::Result<(), BoxError> {
        self.shared.active.store(false, Ordering::Release);
        Ok(())
    }

    fn len(&self) -> usize {
        self.shared.state.lock().map(|st| st.readings.len()).unwrap_or(0)
    }

    fn get(&self, index: usize) -> Option<u16> {
        self.shared
            .state
            .lock()
            .ok()
            .and_then(|st| st.readings.get(index).copied())
    }
}
