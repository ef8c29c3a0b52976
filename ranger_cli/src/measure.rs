//! Backend assembly and the measure / watch / self-check commands.

use std::time::{Duration, Instant};

use eyre::WrapErr;
use ranger_config::Config;
use ranger_core::util::interval_for_hz;
use ranger_core::{CancelToken, DistanceSource, Measurement, RangefinderBuilder, RangerError};
use serde_json::json;
use tracing::{info, warn};

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
use ranger_hardware::{SimulatedBoard, SimulatedRadio};
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
use ranger_traits::MonotonicClock;

/// Name of the compiled-in capture backend (reported by self-check).
pub const BACKEND: &str = if cfg!(all(feature = "hardware", target_os = "linux")) {
    "gpio"
} else {
    "sim"
};

/// Build the configured variant (wired or wireless) behind the shared query interface.
pub fn build_source(cfg: &Config, cancel: CancelToken) -> eyre::Result<Box<dyn DistanceSource>> {
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    let source: Box<dyn DistanceSource> = {
        let board = ranger_hardware::RppalBoard::new()
            .map_err(|e| RangerError::Device(e.to_string()))?;
        let builder = RangefinderBuilder::from_config(board, cfg).with_cancel_token(cancel);
        if cfg.wireless.enabled {
            let link = ranger_hardware::RfcommLink::new(&cfg.wireless.device);
            Box::new(builder.build_wireless(link)?)
        } else {
            Box::new(builder.build_wired()?)
        }
    };

    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    let source: Box<dyn DistanceSource> = {
        let builder = RangefinderBuilder::from_config(sim_board()?, cfg).with_cancel_token(cancel);
        if cfg.wireless.enabled {
            Box::new(builder.build_wireless(sim_radio())?)
        } else {
            Box::new(builder.build_wired()?)
        }
    };

    Ok(source)
}

/// Simulated sensor driven by `RANGER_TEST_SIM_MM` (comma-separated widths,
/// empty for a silent sensor) and `RANGER_TEST_SIM_PERIOD_US`.
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn sim_board() -> eyre::Result<SimulatedBoard<MonotonicClock>> {
    let mut board = SimulatedBoard::new(MonotonicClock::new());
    if let Ok(list) = std::env::var("RANGER_TEST_SIM_MM") {
        board = board.with_readings(parse_readings(&list)?);
    }
    if let Ok(us) = std::env::var("RANGER_TEST_SIM_PERIOD_US") {
        let us: u64 = us
            .trim()
            .parse()
            .wrap_err("RANGER_TEST_SIM_PERIOD_US must be an integer")?;
        board = board.with_pulse_period(Duration::from_micros(us));
    }
    Ok(board)
}

/// `RANGER_TEST_SIM_LINK=never` keeps the simulated central away.
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn sim_radio() -> SimulatedRadio {
    match std::env::var("RANGER_TEST_SIM_LINK").as_deref() {
        Ok("never") => SimulatedRadio::never_connected(),
        _ => SimulatedRadio::connected(),
    }
}

#[cfg_attr(all(feature = "hardware", target_os = "linux"), allow(dead_code))]
fn parse_readings(list: &str) -> eyre::Result<Vec<u16>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u16>()
                .wrap_err_with(|| format!("invalid simulated reading {s:?}"))
        })
        .collect()
}

fn print_measurement(m: &Measurement, attempts: u32, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            json!({
                "distance_mm": m.estimate.millimeters(),
                "basis": m.estimate.basis().as_str(),
                "valid": m.valid_len,
                "window": m.window_len,
                "attempts": attempts,
            })
        );
    } else {
        println!(
            "distance: {} ({} of {} readings valid, {})",
            m.estimate,
            m.valid_len,
            m.window_len,
            m.estimate.basis().as_str()
        );
    }
}

/// One query; retries only when the window held no plausible reading.
pub fn run_measure(source: &mut dyn DistanceSource, retries: u32, json_mode: bool) -> eyre::Result<()> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match source.measure() {
            Ok(m) => {
                print_measurement(&m, attempts, json_mode);
                return Ok(());
            }
            Err(e @ RangerError::NoValidReadings { .. }) if attempts <= retries => {
                warn!(attempt = attempts, error = %e, "retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Repeated queries at `hz` until cancelled or `count` readings were printed.
/// Implausible windows are logged and skipped.
pub fn run_watch(
    source: &mut dyn DistanceSource,
    hz: f32,
    count: Option<u64>,
    cancel: &CancelToken,
    json_mode: bool,
) -> eyre::Result<()> {
    let interval = interval_for_hz(hz);
    let mut taken = 0u64;
    while !cancel.is_cancelled() && count.is_none_or(|c| taken < c) {
        let started = Instant::now();
        match source.measure() {
            Ok(m) => {
                taken += 1;
                print_measurement(&m, 1, json_mode);
            }
            Err(e @ RangerError::NoValidReadings { .. }) => warn!(error = %e, "skipping window"),
            Err(RangerError::Cancelled(_)) => break,
            Err(e) => return Err(e.into()),
        }
        if count.is_some_and(|c| taken >= c) {
            break;
        }
        sleep_unless_cancelled(interval.saturating_sub(started.elapsed()), cancel);
    }
    info!(readings = taken, "watch stopped");
    Ok(())
}

fn sleep_unless_cancelled(mut left: Duration, cancel: &CancelToken) {
    const STEP: Duration = Duration::from_millis(20);
    while !left.is_zero() && !cancel.is_cancelled() {
        let d = left.min(STEP);
        std::thread::sleep(d);
        left = left.saturating_sub(d);
    }
}

/// Building the source opens the capture device; success means it is usable.
pub fn run_self_check(cfg: &Config, json_mode: bool) -> eyre::Result<()> {
    let source = build_source(cfg, CancelToken::new()).wrap_err("self-check failed")?;
    drop(source);
    if json_mode {
        println!(
            "{}",
            json!({
                "status": "ok",
                "backend": BACKEND,
                "pin": cfg.sensor.pin,
                "wireless": cfg.wireless.enabled,
            })
        );
    } else {
        println!(
            "self-check ok: pin {} ({BACKEND}{})",
            cfg.sensor.pin,
            if cfg.wireless.enabled { ", wireless" } else { "" }
        );
    }
    Ok(())
}
