pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Boxed error used at every trait boundary; `ranger_core` maps it to a typed error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A pulse-width capture line: records the width of each high pulse into a
/// bounded buffer while active.
///
/// Readings are kept in arrival order. Implementations stop recording (or
/// overwrite) once `capacity` readings are buffered; callers pause before
/// reading to get a stable snapshot.
pub trait PulseCapture {
    /// Drop every buffered reading.
    fn clear(&mut self) -> Result<(), BoxError>;
    /// Start (or continue) recording pulses.
    fn resume(&mut self) -> Result<(), BoxError>;
    /// Stop recording; buffered readings are kept.
    fn pause(&mut self) -> Result<(), BoxError>;
    /// Number of readings currently buffered.
    fn len(&self) -> usize;
    /// Reading at `index` (0 = oldest), if buffered.
    fn get(&self, index: usize) -> Option<u16>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hands out capture lines by pin number.
///
/// Opening fails for pins that do not exist or are already claimed; a failed
/// open must not leave the pin claimed.
pub trait CaptureBoard {
    type Capture: PulseCapture;

    fn open_pulse_in(&self, pin: u8, capacity: usize) -> Result<Self::Capture, BoxError>;
}

/// Wireless serial collaborator consumed by the wireless rangefinder.
pub trait RadioLink {
    /// Begin advertising a discoverable serial service.
    fn start_advertising(&mut self) -> Result<(), BoxError>;
    fn is_connected(&mut self) -> bool;
    fn send(&mut self, bytes: &[u8]) -> Result<(), BoxError>;
}

impl<P: PulseCapture + ?Sized> PulseCapture for Box<P> {
    fn clear(&mut self) -> Result<(), BoxError> {
        (**self).clear()
    }
    fn resume(&mut self) -> Result<(), BoxError> {
        (**self).resume()
    }
    fn pause(&mut self) -> Result<(), BoxError> {
        (**self).pause()
    }
    fn len(&self) -> usize {
        (**self).len()
    }
    fn get(&self, index: usize) -> Option<u16> {
        (**self).get(index)
    }
}

impl<B: CaptureBoard + ?Sized> CaptureBoard for &B {
    type Capture = B::Capture;

    fn open_pulse_in(&self, pin: u8, capacity: usize) -> Result<Self::Capture, BoxError> {
        (**self).open_pulse_in(pin, capacity)
    }
}

impl<R: RadioLink + ?Sized> RadioLink for Box<R> {
    fn start_advertising(&mut self) -> Result<(), BoxError> {
        (**self).start_advertising()
    }
    fn is_connected(&mut self) -> bool {
        (**self).is_connected()
    }
    fn send(&mut self, bytes: &[u8]) -> Result<(), BoxError> {
        (**self).send(bytes)
    }
}
