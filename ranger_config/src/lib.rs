#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the rangefinder.
//!
//! `Config` and its sections are deserialized from TOML and checked by
//! `Config::validate`. Sections other than `[sensor]` are optional.
use serde::Deserialize;

/// Sensor datasheet minimum is 300 mm; readings of exactly 300 mean "too close"
/// and occasionally show up as 301.
pub const DEFAULT_MIN_VALID_MM: u16 = 301;
pub const DEFAULT_MAX_VALID_MM: u16 = 5000;
pub const DEFAULT_SAMPLE_NUM: usize = 20;
/// Upper bound on `sample_num`; at 10 Hz this is already ~100 s per query.
pub const MAX_SAMPLE_NUM: usize = 1024;

#[derive(Debug, Deserialize)]
pub struct Sensor {
    /// Pin carrying the sensor's pulse-width output
    pub pin: u8,
    #[serde(default = "default_sample_num")]
    pub sample_num: usize,
    #[serde(default = "default_min_valid_mm")]
    pub min_valid_mm: u16,
    #[serde(default = "default_max_valid_mm")]
    pub max_valid_mm: u16,
}

fn default_sample_num() -> usize {
    DEFAULT_SAMPLE_NUM
}

fn default_min_valid_mm() -> u16 {
    DEFAULT_MIN_VALID_MM
}

fn default_max_valid_mm() -> u16 {
    DEFAULT_MAX_VALID_MM
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Max time to wait for `sample_num` pulses. Also accepts alias "capture_ms".
    #[serde(alias = "capture_ms")]
    pub acquire_ms: u64,
    /// Max time to wait for the wireless link to connect
    pub connect_ms: u64,
    /// Poll interval while waiting (microseconds)
    pub poll_us: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            acquire_ms: 5_000,
            connect_ms: 30_000,
            poll_us: 500,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Wireless {
    pub enabled: bool,
    /// RFCOMM tty the paired central connects through
    pub device: String,
}

impl Default for Wireless {
    fn default() -> Self {
        Self {
            enabled: false,
            device: "/dev/rfcomm0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Never,
    Daily,
    Hourly,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    pub rotation: Rotation,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub sensor: Sensor,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub wireless: Wireless,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    cfg.validate()
        .map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sensor
        if self.sensor.sample_num == 0 {
            eyre::bail!("sensor.sample_num must be >= 1");
        }
        if self.sensor.sample_num > MAX_SAMPLE_NUM {
            eyre::bail!("sensor.sample_num must be <= {MAX_SAMPLE_NUM}");
        }
        if self.sensor.min_valid_mm == 0 {
            eyre::bail!("sensor.min_valid_mm must be >= 1");
        }
        if self.sensor.min_valid_mm > self.sensor.max_valid_mm {
            eyre::bail!("sensor.min_valid_mm must be <= sensor.max_valid_mm");
        }

        // Timeouts
        if self.timeouts.acquire_ms == 0 {
            eyre::bail!("timeouts.acquire_ms must be >= 1");
        }
        if self.timeouts.connect_ms == 0 {
            eyre::bail!("timeouts.connect_ms must be >= 1");
        }
        if self.timeouts.poll_us == 0 {
            eyre::bail!("timeouts.poll_us must be >= 1");
        }
        if self.timeouts.poll_us / 1_000 > self.timeouts.acquire_ms {
            eyre::bail!("timeouts.poll_us must not exceed timeouts.acquire_ms");
        }

        // Wireless
        if self.wireless.enabled && self.wireless.device.trim().is_empty() {
            eyre::bail!("wireless.device must be set when wireless.enabled = true");
        }

        // Logging: rotation is restricted by serde
        if let Some(level) = self.logging.level.as_deref()
            && !matches!(
                level.to_ascii_lowercase().as_str(),
                "error" | "warn" | "info" | "debug" | "trace"
            )
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = load_toml("[sensor]\npin = 13\n").unwrap();
        assert_eq!(cfg.sensor.sample_num, DEFAULT_SAMPLE_NUM);
        assert_eq!(cfg.sensor.min_valid_mm, 301);
        assert_eq!(cfg.sensor.max_valid_mm, 5000);
        assert!(!cfg.wireless.enabled);
        assert_eq!(cfg.logging.rotation, Rotation::Never);
        cfg.validate().unwrap();
    }

    #[test]
    fn capture_ms_alias_is_accepted() {
        let cfg = load_toml("[sensor]\npin = 13\n[timeouts]\ncapture_ms = 900\n").unwrap();
        assert_eq!(cfg.timeouts.acquire_ms, 900);
        assert_eq!(cfg.timeouts.connect_ms, Timeouts::default().connect_ms);
    }
}
