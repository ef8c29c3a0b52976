#![no_main]
use libfuzzer_sys::fuzz_target;
use ranger_core::{Estimator, SampleWindow, ValidRange};

fuzz_target!(|input: (u16, u16, Vec<u16>)| {
    let (a, b, raw) = input;
    let range = ValidRange::new(a.min(b), a.max(b));
    let window = SampleWindow::from(raw);
    if let Ok(m) = Estimator::new(range).estimate(&window) {
        // The estimate is always one of the plausible readings.
        assert!(range.contains(m.estimate.millimeters()));
        assert!(window.as_slice().contains(&m.estimate.millimeters()));
        assert!(m.valid_len >= 1 && m.valid_len <= m.window_len);
    }
});
