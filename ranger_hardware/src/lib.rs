//! Capture and link backends for the rangefinder.
//!
//! - `sim`: simulated board, pulse capture and radio (always available).
//! - `rfcomm`: Bluetooth serial link over an RFCOMM tty.
//! - `pulse_in`: interrupt-driven GPIO pulse capture via rppal (feature `hardware`, Linux).
pub mod error;
pub mod rfcomm;
pub mod sim;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod pulse_in;

pub use rfcomm::RfcommLink;
pub use sim::{SentFrames, SimulatedBoard, SimulatedPulseCapture, SimulatedRadio};

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use pulse_in::{GpioPulseIn, RppalBoard};

#[cfg(test)]
mod tests {
    use super::*;
    use ranger_traits::clock::test_clock::TestClock;
    use ranger_traits::{CaptureBoard, PulseCapture, RadioLink};
    use std::time::Duration;

    #[test]
    fn test_simulated_capture_fills_while_active() {
        let clock = TestClock::new();
        let board = SimulatedBoard::new(clock.clone())
            .with_pulse_period(Duration::from_millis(10))
            .with_readings(vec![500, 600, 700]);
        let mut cap = board.open_pulse_in(13, 4).unwrap();

        cap.resume().unwrap();
        clock.advance(Duration::from_millis(25));
        assert_eq!(cap.len(), 2);
        clock.advance(Duration::from_millis(100));
        assert_eq!(cap.len(), 4, "buffer is capped at capacity");
        cap.pause().unwrap();

        let got: Vec<u16> = (0..4).filter_map(|i| cap.get(i)).collect();
        assert_eq!(got, vec![500, 600, 700, 500]);
    }

    #[test]
    fn test_simulated_capture_frozen_while_paused() {
        let clock = TestClock::new();
        let board = SimulatedBoard::new(clock.clone()).with_pulse_period(Duration::from_millis(1));
        let cap = board.open_pulse_in(5, 8).unwrap();
        clock.advance(Duration::from_millis(50));
        assert!(cap.is_empty());
        assert!(!cap.is_active());
    }

    #[test]
    fn test_simulated_radio_connects_after_polls() {
        let mut radio = SimulatedRadio::connect_after(2);
        assert!(!radio.is_connected());
        assert!(!radio.is_connected());
        assert!(radio.is_connected());
        radio.send(b"1234\n").unwrap();
        assert_eq!(radio.sent_frames().borrow().as_slice(), &[b"1234\n".to_vec()]);
    }

    #[test]
    fn test_simulated_radio_rejects_send_when_disconnected() {
        let mut radio = SimulatedRadio::never_connected();
        assert!(radio.send(b"1\n").is_err());
    }
}
