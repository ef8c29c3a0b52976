use ranger_core::error::BuildError;
use ranger_core::{RangefinderBuilder, RangerError, Timeouts, ValidRange};
use ranger_hardware::{SimulatedBoard, SimulatedRadio};
use ranger_traits::clock::test_clock::TestClock;
use rstest::rstest;

fn board() -> SimulatedBoard<TestClock> {
    SimulatedBoard::new(TestClock::new())
}

#[rstest]
fn builder_missing_pin_yields_typed_build_error() {
    let board = board();
    let err = RangefinderBuilder::new(&board)
        // missing with_pin()
        .try_build_wired()
        .err()
        .expect("should fail with MissingPin");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingPin) => {}
        other => panic!("expected MissingPin, got: {other:?}"),
    }
}

#[rstest]
#[case::invalid_pin(99)]
#[case::out_of_header(28)]
fn invalid_pin_yields_device_error_and_claims_nothing(#[case] pin: u8) {
    let board = board();
    let err = RangefinderBuilder::new(&board)
        .with_pin(pin)
        .build_wired()
        .err()
        .expect("invalid pin");

    assert!(matches!(
        err.downcast_ref::<RangerError>(),
        Some(RangerError::Device(_))
    ));
    assert_eq!(board.claimed_count(), 0);
}

#[test]
fn occupied_pin_yields_device_error_and_keeps_first_owner() {
    let board = board();
    let first = RangefinderBuilder::new(&board)
        .with_pin(13)
        .build_wired()
        .expect("first build");

    let err = RangefinderBuilder::new(&board)
        .with_pin(13)
        .build_wireless(SimulatedRadio::connected())
        .err()
        .expect("pin busy");
    let msg = err.to_string();
    assert!(msg.contains("pin 13"), "unexpected: {msg}");
    assert!(matches!(
        err.downcast_ref::<RangerError>(),
        Some(RangerError::Device(_))
    ));
    assert!(board.is_claimed(13));

    drop(first);
    assert!(!board.is_claimed(13));
    RangefinderBuilder::new(&board)
        .with_pin(13)
        .build_wired()
        .expect("pin free again");
}

#[rstest]
#[case::zero_samples(0, ValidRange::default(), Timeouts::default())]
#[case::inverted_range(20, ValidRange::new(5000, 301), Timeouts::default())]
#[case::zero_acquire(20, ValidRange::default(), Timeouts { acquire: std::time::Duration::ZERO, ..Timeouts::default() })]
fn invalid_settings_are_rejected_before_opening(
    #[case] sample_num: usize,
    #[case] range: ValidRange,
    #[case] timeouts: Timeouts,
) {
    let board = board();
    let err = RangefinderBuilder::new(&board)
        .with_pin(13)
        .with_sample_num(sample_num)
        .with_valid_range(range)
        .with_timeouts(timeouts)
        .build_wired()
        .err()
        .expect("invalid settings");

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
    assert!(!board.is_claimed(13));
}

#[test]
fn from_config_applies_sensor_section() {
    let cfg = ranger_config::load_toml("[sensor]\npin = 7\nsample_num = 8\n").unwrap();
    let board = board();
    let rf = RangefinderBuilder::from_config(&board, &cfg)
        .build_wired()
        .expect("build from config");
    assert_eq!(rf.sample_num(), 8);
    assert!(board.is_claimed(7));
}
