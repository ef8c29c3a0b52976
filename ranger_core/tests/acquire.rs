use std::time::Duration;

use ranger_core::{CancelToken, PulseAcquirer, RangerError, Timeouts, WaitPoint};
use ranger_hardware::SimulatedBoard;
use ranger_traits::clock::test_clock::TestClock;
use ranger_traits::{CaptureBoard, PulseCapture};

fn timeouts(acquire_ms: u64) -> Timeouts {
    Timeouts {
        acquire: Duration::from_millis(acquire_ms),
        ..Timeouts::default()
    }
}

fn board(clock: &TestClock, readings: Vec<u16>) -> SimulatedBoard<TestClock> {
    SimulatedBoard::new(clock.clone())
        .with_pulse_period(Duration::from_millis(10))
        .with_readings(readings)
}

#[test]
fn window_preserves_arrival_order_and_pauses() {
    let clock = TestClock::new();
    let board = board(&clock, (401..=430).collect());
    let cap = board.open_pulse_in(13, 5).unwrap();
    let mut acq = PulseAcquirer::new(cap, 5, &timeouts(1_000), clock.clone());

    let w = acq.acquire(&CancelToken::new()).expect("acquire");
    assert_eq!(w.as_slice(), &[401, 402, 403, 404, 405]);
    assert!(!acq.capture().is_active(), "capture must be paused after a burst");

    let w2 = acq.acquire(&CancelToken::new()).expect("second acquire");
    assert_eq!(w2.as_slice(), &[406, 407, 408, 409, 410]);
}

#[test]
fn stale_readings_are_cleared_before_resuming() {
    let clock = TestClock::new();
    let board = board(&clock, (401..=430).collect());
    let mut cap = board.open_pulse_in(13, 5).unwrap();
    cap.resume().unwrap();
    clock.advance(Duration::from_millis(30));
    cap.pause().unwrap();
    assert_eq!(cap.len(), 3);

    let mut acq = PulseAcquirer::new(cap, 5, &timeouts(1_000), clock.clone());
    let w = acq.acquire(&CancelToken::new()).expect("acquire");
    assert_eq!(w.as_slice(), &[404, 405, 406, 407, 408]);
}

#[test]
fn silent_sensor_times_out_and_leaves_capture_paused() {
    let clock = TestClock::new();
    let board = board(&clock, Vec::new());
    let cap = board.open_pulse_in(13, 20).unwrap();
    let mut acq = PulseAcquirer::new(cap, 20, &timeouts(50), clock.clone());

    let err = acq.acquire(&CancelToken::new()).expect_err("timeout");
    assert_eq!(err, RangerError::Timeout(WaitPoint::Pulses));
    assert!(!acq.capture().is_active());
    assert!(clock.elapsed() >= Duration::from_millis(50));
}

#[test]
fn cancellation_aborts_a_pending_burst() {
    let clock = TestClock::new();
    let board = board(&clock, Vec::new());
    let cap = board.open_pulse_in(13, 20).unwrap();
    let mut acq = PulseAcquirer::new(cap, 20, &timeouts(60_000), clock.clone());

    let cancel = CancelToken::new();
    cancel.cancel();
    let err = acq.acquire(&cancel).expect_err("cancelled");
    assert_eq!(err, RangerError::Cancelled(WaitPoint::Pulses));
    assert!(!acq.capture().is_active());
    assert_eq!(clock.elapsed(), Duration::ZERO);
}
