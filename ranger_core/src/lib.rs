#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core rangefinder pipeline (hardware-agnostic).
//!
//! Every hardware interaction goes through the `ranger_traits::PulseCapture`,
//! `CaptureBoard` and `RadioLink` traits.
//!
//! ## Pipeline
//!
//! - **Acquisition**: clear, resume, bounded wait for `sample_num` pulses, pause, read (`acquire`)
//! - **Validation**: keep readings inside the sensor's plausible band (`filter`)
//! - **Reduction**: mode with median fallback over the sorted valid set (`reduce`)
//! - **Query**: `DistanceSource::distance` on a wired or wireless rangefinder (`rangefinder`)
//!
//! ## Units
//!
//! Raw pulse widths are microseconds, and the sensor emits 1 µs per millimetre, so
//! readings and estimates share one integer unit and no conversion happens anywhere.
//!
//! ## Waiting
//!
//! The two blocking points of a query (link connection, buffer fill) are
//! polled against a `Clock` with a timeout and a `CancelToken`.

pub mod acquire;
pub mod builder;
pub mod cancel;
pub mod config;
pub mod conversions;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod hw_error;
pub mod rangefinder;
pub mod reduce;
pub mod sample;
pub mod util;
pub mod wait;

pub use acquire::PulseAcquirer;
pub use builder::RangefinderBuilder;
pub use cancel::CancelToken;
pub use config::{DEFAULT_SAMPLE_NUM, Timeouts, ValidRange};
pub use error::{BuildError, RangerError, RangerResult, WaitPoint};
pub use estimator::Estimator;
pub use rangefinder::{DistanceSource, WiredRangefinder, WirelessRangefinder, encode_line};
pub use reduce::reduce;
pub use sample::{Basis, DistanceEstimate, Measurement, RawSample, SampleWindow, ValidSampleSet};
