//! Human-readable error descriptions and structured JSON error formatting.

use ranger_core::error::{BuildError, RangerError, WaitPoint};
use serde_json::json;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingPin => {
                "What happened: No capture pin was configured.\nLikely causes: The builder was used without with_pin(...).\nHow to fix: Set [sensor].pin in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(re) = err.downcast_ref::<RangerError>() {
        return match re {
            RangerError::Device(detail) => format!(
                "What happened: The pulse capture device could not be opened ({detail}).\nLikely causes: Wrong [sensor].pin, the pin is used by another process, or no GPIO permission.\nHow to fix: Check the wiring and [sensor].pin; run as a user in the gpio group."
            ),
            RangerError::NoValidReadings {
                window,
                min_mm,
                max_mm,
            } => format!(
                "What happened: None of the {window} readings were between {min_mm} mm and {max_mm} mm.\nLikely causes: Object closer than the sensor's minimum, nothing in range, or the sensor is misaligned.\nHow to fix: Reposition the sensor or target; use --retries to re-acquire automatically."
            ),
            RangerError::Timeout(WaitPoint::Pulses) => {
                "What happened: The sensor did not produce enough pulses in time.\nLikely causes: PW output not wired to [sensor].pin, no power/ground, or timeouts.acquire_ms too low.\nHow to fix: Verify the wiring and power, and consider raising timeouts.acquire_ms.".to_string()
            }
            RangerError::Timeout(WaitPoint::Link) => {
                "What happened: No wireless central connected in time.\nLikely causes: Nothing paired, the RFCOMM device is not bound, or timeouts.connect_ms too low.\nHow to fix: Pair and connect a client, check [wireless].device, or raise timeouts.connect_ms.".to_string()
            }
            RangerError::Cancelled(point) => {
                format!("What happened: Interrupted while waiting for {point}.\nHow to fix: Nothing; rerun when ready.")
            }
            RangerError::Link(detail) => format!(
                "What happened: Sending the reading over the wireless link failed ({detail}).\nLikely causes: The client disconnected mid-query.\nHow to fix: Reconnect the client and retry."
            ),
            RangerError::Hardware(detail) => format!(
                "What happened: Hardware error ({detail}).\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file."
        );
    }

    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Unknown keys, wrong types, or out-of-range values in [sensor], [timeouts], [wireless] or [logging].\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for scripting; anything unclassified exits with 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<RangerError>() {
        Some(RangerError::NoValidReadings { .. }) => 3,
        Some(RangerError::Timeout(_)) => 4,
        Some(RangerError::Device(_)) => 5,
        Some(RangerError::Link(_)) => 6,
        Some(RangerError::Cancelled(_)) => 130,
        _ => 1,
    }
}

fn reason_name(err: &RangerError) -> &'static str {
    match err {
        RangerError::Device(_) => "Device",
        RangerError::NoValidReadings { .. } => "NoValidReadings",
        RangerError::Timeout(_) => "Timeout",
        RangerError::Cancelled(_) => "Cancelled",
        RangerError::Hardware(_) => "Hardware",
        RangerError::Link(_) => "Link",
    }
}

fn wait_point_name(point: WaitPoint) -> &'static str {
    match point {
        WaitPoint::Pulses => "pulses",
        WaitPoint::Link => "link",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    let msg = humanize(err);
    if let Some(re) = err.downcast_ref::<RangerError>() {
        let details = match re {
            RangerError::NoValidReadings {
                window,
                min_mm,
                max_mm,
            } => Some(json!({ "window": window, "min_mm": min_mm, "max_mm": max_mm })),
            RangerError::Timeout(p) | RangerError::Cancelled(p) => {
                Some(json!({ "wait": wait_point_name(*p) }))
            }
            _ => None,
        };
        let obj = match details {
            Some(d) => json!({ "reason": reason_name(re), "details": d, "message": msg }),
            None => json!({ "reason": reason_name(re), "message": msg }),
        };
        return obj.to_string();
    }

    // Generic error JSON
    json!({ "reason": "Error", "message": msg }).to_string()
}
