//! Bounded polling wait, replacing unbounded spins on hardware state.

use std::time::Duration;

use ranger_traits::Clock;

use crate::cancel::CancelToken;
use crate::error::{RangerError, RangerResult, WaitPoint};

/// Poll `ready` every `poll` until it returns true, `timeout` elapses on
/// `clock`, or `cancel` fires. `ready` is always checked once before the
/// deadline or the token are looked at.
pub fn wait_until<C: Clock>(
    clock: &C,
    mut ready: impl FnMut() -> bool,
    timeout: Duration,
    poll: Duration,
    cancel: &CancelToken,
    point: WaitPoint,
) -> RangerResult<()> {
    let deadline = clock.deadline(timeout);
    loop {
        if ready() {
            return Ok(());
        }
        if cancel.is_cancelled() {
            return Err(RangerError::Cancelled(point));
        }
        if clock.expired(deadline) {
            return Err(RangerError::Timeout(point));
        }
        clock.sleep(poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranger_traits::clock::test_clock::TestClock;

    #[test]
    fn returns_once_predicate_holds() {
        let clock = TestClock::new();
        let mut polls = 0;
        let res = wait_until(
            &clock,
            || {
                polls += 1;
                polls > 3
            },
            Duration::from_millis(50),
            Duration::from_millis(1),
            &CancelToken::new(),
            WaitPoint::Pulses,
        );
        assert!(res.is_ok());
        assert_eq!(clock.elapsed(), Duration::from_millis(3));
    }

    #[test]
    fn times_out_on_virtual_clock() {
        let clock = TestClock::new();
        let err = wait_until(
            &clock,
            || false,
            Duration::from_millis(5),
            Duration::from_micros(200),
            &CancelToken::new(),
            WaitPoint::Link,
        )
        .expect_err("expected timeout");
        assert_eq!(err, RangerError::Timeout(WaitPoint::Link));
        assert!(clock.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn cancelled_token_stops_the_wait() {
        let clock = TestClock::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = wait_until(
            &clock,
            || false,
            Duration::from_secs(60),
            Duration::from_millis(1),
            &cancel,
            WaitPoint::Pulses,
        )
        .expect_err("expected cancel");
        assert_eq!(err, RangerError::Cancelled(WaitPoint::Pulses));
    }
}
