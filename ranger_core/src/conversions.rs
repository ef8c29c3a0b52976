//! `From` implementations bridging `ranger_config` types to `ranger_core` types.

use std::time::Duration;

use crate::config::{Timeouts, ValidRange};

impl From<&ranger_config::Sensor> for ValidRange {
    fn from(s: &ranger_config::Sensor) -> Self {
        Self::new(s.min_valid_mm, s.max_valid_mm)
    }
}

impl From<&ranger_config::Timeouts> for Timeouts {
    fn from(t: &ranger_config::Timeouts) -> Self {
        Self {
            acquire: Duration::from_millis(t.acquire_ms),
            connect: Duration::from_millis(t.connect_ms),
            poll: Duration::from_micros(t.poll_us),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_sections_map_to_core_types() {
        let cfg = ranger_config::load_toml(
            "[sensor]\npin = 2\nmin_valid_mm = 350\nmax_valid_mm = 4000\n[timeouts]\nacquire_ms = 1500\npoll_us = 250\n",
        )
        .unwrap();
        assert_eq!(ValidRange::from(&cfg.sensor), ValidRange::new(350, 4000));
        let t = Timeouts::from(&cfg.timeouts);
        assert_eq!(t.acquire, Duration::from_millis(1500));
        assert_eq!(t.connect, Duration::from_secs(30));
        assert_eq!(t.poll, Duration::from_micros(250));
    }
}
