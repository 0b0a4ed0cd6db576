//! `peaksignal` is a library for detecting peaks in one-dimensional numeric
//! signals such as time series or spectra.
//!
//! The main entry point is [`PeakDetector`], which offers two independent strategies:
//!
//! - [`DetectionMode::Threshold`] splits the signal into "islands" of samples at or
//!   above a minimum height, finds plateau-aware local maxima in each island, estimates
//!   a characteristic peak width per island and discards candidates that sit too close
//!   to a taller candidate of the same island. The separation radius is derived from
//!   the estimated width rather than fixed up front.
//! - [`DetectionMode::Wavelet`] sums the absolute responses of a bank of Ricker
//!   wavelets and keeps the peaks of that aggregate which are sufficiently prominent,
//!   for signals where a single height threshold is unreliable.
//!
//! Detection is a pure function of its input: nothing is cached between calls and the
//! same input always produces the same [`PipelineResult`].
//!
//! # Usage
//! ```
//! use peaksignal::{PeakDetector, DetectionMode};
//!
//! let signal = [0.0, 0.0, 12.0, 12.0, 11.0, 0.0, 0.0, 20.0, 0.0];
//! let detector = PeakDetector::builder()
//!     .mode(DetectionMode::Threshold)
//!     .min_height(10.0)
//!     .alpha(0.5)
//!     .build();
//! let result = detector.detect(&signal).unwrap();
//! assert_eq!(result.len(), 2);
//! for peak in result.iter() {
//!     println!("{}", peak);
//! }
//! ```
//!
//! When detecting on a window of a larger signal, [`PeakDetector::detect_in_range`]
//! reports indices in the coordinates of the full signal.
//!
//! ## Features
//! - `parallelism` (default): process islands and wavelet scales in parallel with `rayon`.
//!   Suppression is always a single pass over all candidates, so results do not change.
//! - `serde`: serialize results using the field names `W_region`, `R_region`,
//!   `W_by_island` and `R_by_island`.
pub mod arrayops;
pub mod island;
pub mod local_maxima;
pub mod peak;
pub mod pipeline;
pub mod prelude;
pub mod search;
pub mod statistics;
pub mod suppress;
pub mod wavelet;
pub mod width;

#[cfg(test)]
mod test_data;

pub use crate::arrayops::ArrayPair;
pub use crate::peak::{Candidate, Island, KeptPeak, LocalMaximum, RegionStats, Sample, NO_REGION};
pub use crate::pipeline::{
    detect_peaks, DetectionMode, PeakDetector, PeakDetectorBuilder, PipelineError,
    PipelineResult, ThresholdParams, WaveletParams,
};
pub use crate::width::radius_rule;
