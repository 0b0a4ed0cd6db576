//! Orchestrate peak detection over a whole signal.
//!
//! [`PeakDetector`] dispatches between the two strategies:
//!
//! - [`DetectionMode::Threshold`] segments the signal into islands at or above
//!   a minimum height, finds plateau-aware local maxima in each, estimates a
//!   width per island and suppresses nearby candidates with a radius derived
//!   from that width.
//! - [`DetectionMode::Wavelet`] ignores the height threshold entirely and picks
//!   peaks from a multiscale Ricker wavelet transform, see [`crate::wavelet`].
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use cfg_if::cfg_if;
use log::{debug, log_enabled, trace, Level};
use thiserror::Error;

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrayops::ArrayPair;
use crate::island::islands_of_activity;
use crate::local_maxima::find_local_maxima;
use crate::peak::{Island, KeptPeak, LocalMaximum, RegionStats, Sample};
use crate::suppress::{flatten_candidates, suppress};
use crate::wavelet::{detect_wavelet_peaks, DEFAULT_PROMINENCE_FACTOR, DEFAULT_SCALES};
use crate::width::region_stats;

/// The default minimum height of an island
pub const APEX_MIN_HEIGHT: f64 = 10.0;
/// The default fraction of a peak's height its width is measured at. Lower
/// values suit spiky peaks, higher values suit broad ones.
pub const ALPHA: f64 = 0.5;

/// All the ways peak detection can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Unknown detection mode {0:?}, expected \"threshold\" or \"wavelet\"")]
    InvalidMode(String),
    #[error("The x and y arrays do not match in length ({x_len} != {y_len})")]
    ShapeMismatch { x_len: usize, y_len: usize },
    #[error("Wavelet scales must be positive, received {0}")]
    InvalidScale(usize),
}

/// The peak detection strategy to use
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DetectionMode {
    /// Height-thresholded islands with adaptive-width suppression
    #[default]
    Threshold,
    /// Prominence of a multiscale Ricker wavelet response
    Wavelet,
}

impl DetectionMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Wavelet => "wavelet",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold" => Ok(Self::Threshold),
            "wavelet" => Ok(Self::Wavelet),
            _ => Err(PipelineError::InvalidMode(s.to_string())),
        }
    }
}

/// Parameters of [`DetectionMode::Threshold`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdParams<F: Sample> {
    /// Samples below this value never belong to an island
    pub min_height: F,
    /// The fraction of each peak's height at which its width is measured
    pub alpha: F,
}

impl<F: Sample> Default for ThresholdParams<F> {
    fn default() -> Self {
        Self {
            min_height: F::from_f64(APEX_MIN_HEIGHT).unwrap_or_else(F::zero),
            alpha: F::from_f64(ALPHA).unwrap_or_else(F::zero),
        }
    }
}

/// Parameters of [`DetectionMode::Wavelet`]
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletParams<F: Sample> {
    /// The Ricker wavelet scales to aggregate over
    pub scales: Vec<usize>,
    /// The multiple of the aggregate response's median a peak must be prominent by
    pub prominence_factor: F,
}

impl<F: Sample> Default for WaveletParams<F> {
    fn default() -> Self {
        Self {
            scales: DEFAULT_SCALES.collect(),
            prominence_factor: F::from_f64(DEFAULT_PROMINENCE_FACTOR).unwrap_or_else(F::zero),
        }
    }
}

/// The outcome of a single detection run.
///
/// Only [`DetectionMode::Threshold`] populates the per-island collections; they are
/// left empty by [`DetectionMode::Wavelet`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineResult<F> {
    pub mode: DetectionMode,
    pub islands: Vec<Island>,
    /// The local maxima of each island, parallel to `islands`
    pub local_max: Vec<Vec<LocalMaximum<F>>>,
    /// The estimated width of each island
    #[cfg_attr(feature = "serde", serde(rename = "W_by_island"))]
    pub widths: Vec<usize>,
    /// The suppression radius of each island
    #[cfg_attr(feature = "serde", serde(rename = "R_by_island"))]
    pub radii: Vec<usize>,
    /// The surviving peaks, sorted by region and then index
    pub kept_rows: Vec<KeptPeak<F>>,
}

impl<F> PipelineResult<F> {
    fn from_wavelet(kept_rows: Vec<KeptPeak<F>>) -> Self {
        Self {
            mode: DetectionMode::Wavelet,
            islands: Vec::new(),
            local_max: Vec::new(),
            widths: Vec::new(),
            radii: Vec::new(),
            kept_rows,
        }
    }

    /// The number of kept peaks
    pub fn len(&self) -> usize {
        self.kept_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept_rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeptPeak<F>> {
        self.kept_rows.iter()
    }

    /// Translate every index in this result by `offset`, converting indices
    /// relative to a slice into indices of the signal the slice was taken from.
    pub fn shift_indices(&mut self, offset: usize) {
        if offset == 0 {
            return;
        }
        for island in self.islands.iter_mut() {
            island.start += offset;
            island.end += offset;
        }
        for maxima in self.local_max.iter_mut() {
            for m in maxima.iter_mut() {
                m.index += offset;
            }
        }
        for row in self.kept_rows.iter_mut() {
            row.index += offset;
        }
    }
}

impl<'a, F> IntoIterator for &'a PipelineResult<F> {
    type Item = &'a KeptPeak<F>;
    type IntoIter = std::slice::Iter<'a, KeptPeak<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.kept_rows.iter()
    }
}

/// Find the local maxima of and estimate statistics for each island. The
/// islands are independent of one another, so they may be processed in parallel.
fn analyze_islands<F: Sample>(
    signal: &[F],
    islands: &[Island],
    alpha: F,
) -> Vec<(Vec<LocalMaximum<F>>, RegionStats)> {
    let analyze = |island: &Island| {
        let maxima = find_local_maxima(signal, island);
        let stats = region_stats(signal, island, &maxima, alpha);
        (maxima, stats)
    };
    cfg_if! {
        if #[cfg(feature = "parallelism")] {
            return islands.par_iter().map(analyze).collect();
        } else {
            return islands.iter().map(analyze).collect();
        }
    }
}

/// A configurable peak detector for one-dimensional signals.
///
/// The detector holds no state between calls; every invocation of
/// [`PeakDetector::detect`] builds its result from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakDetector<F: Sample = f64> {
    pub mode: DetectionMode,
    pub threshold: ThresholdParams<F>,
    pub wavelet: WaveletParams<F>,
}

impl<F: Sample> Default for PeakDetector<F> {
    fn default() -> Self {
        Self {
            mode: DetectionMode::default(),
            threshold: ThresholdParams::default(),
            wavelet: WaveletParams::default(),
        }
    }
}

impl<F: Sample> PeakDetector<F> {
    pub fn new(
        mode: DetectionMode,
        threshold: ThresholdParams<F>,
        wavelet: WaveletParams<F>,
    ) -> Self {
        Self {
            mode,
            threshold,
            wavelet,
        }
    }

    pub fn builder() -> PeakDetectorBuilder<F> {
        PeakDetectorBuilder::default()
    }

    /// Detect peaks in `signal` using the configured [`DetectionMode`]
    pub fn detect(&self, signal: &[F]) -> Result<PipelineResult<F>, PipelineError> {
        match self.mode {
            DetectionMode::Threshold => Ok(self.detect_threshold(signal)),
            DetectionMode::Wavelet => self.detect_wavelet(signal),
        }
    }

    /// Detect peaks in `signal` with the mode named by `mode`, overriding
    /// the configured one.
    pub fn detect_with_mode(
        &self,
        signal: &[F],
        mode: &str,
    ) -> Result<PipelineResult<F>, PipelineError> {
        match mode.parse::<DetectionMode>()? {
            DetectionMode::Threshold => Ok(self.detect_threshold(signal)),
            DetectionMode::Wavelet => self.detect_wavelet(signal),
        }
    }

    /// Run the island, local maximum, width and suppression stages over `signal`.
    ///
    /// Suppression runs once over the candidates of every island together, after
    /// all per-island statistics are known.
    pub fn detect_threshold(&self, signal: &[F]) -> PipelineResult<F> {
        let ThresholdParams { min_height, alpha } = self.threshold;

        let islands = islands_of_activity(signal, min_height);
        let (local_max, stats): (Vec<_>, Vec<_>) =
            analyze_islands(signal, &islands, alpha).into_iter().unzip();

        if log_enabled!(Level::Trace) {
            for (island, s) in islands.iter().zip(stats.iter()) {
                trace!("Island {island}: W = {}, R = {}", s.width, s.radius);
            }
        }

        let candidates = flatten_candidates(&local_max);
        let kept = suppress(&candidates, &stats);

        debug!(
            "Threshold detection over {} samples: {} islands, {} candidates, {} kept",
            signal.len(),
            islands.len(),
            candidates.len(),
            kept.len()
        );

        let kept_rows = kept
            .into_iter()
            .map(|c| {
                let s = stats[c.region_id];
                KeptPeak::new(c.index, c.value, c.region_id as i32, s.width, s.radius)
            })
            .collect();

        PipelineResult {
            mode: DetectionMode::Threshold,
            islands,
            local_max,
            widths: stats.iter().map(|s| s.width).collect(),
            radii: stats.iter().map(|s| s.radius).collect(),
            kept_rows,
        }
    }

    /// Pick peaks from the Ricker wavelet transform of `signal`
    pub fn detect_wavelet(&self, signal: &[F]) -> Result<PipelineResult<F>, PipelineError> {
        if self.wavelet.scales.contains(&0) {
            return Err(PipelineError::InvalidScale(0));
        }
        let kept = detect_wavelet_peaks(
            signal,
            &self.wavelet.scales,
            self.wavelet.prominence_factor,
        );
        Ok(PipelineResult::from_wavelet(kept))
    }

    /// Detect peaks in `signal[range]`, reporting indices relative to the whole of
    /// `signal`. `range` is clamped to the bounds of `signal`.
    pub fn detect_in_range(
        &self,
        signal: &[F],
        range: Range<usize>,
    ) -> Result<PipelineResult<F>, PipelineError> {
        let end = range.end.min(signal.len());
        let start = range.start.min(end);
        let mut result = self.detect(&signal[start..end])?;
        result.shift_indices(start);
        Ok(result)
    }

    /// Detect peaks among the samples of `arrays` whose coordinates lie in `[lo, hi]`,
    /// reporting indices into the full arrays.
    pub fn detect_between(
        &self,
        arrays: &ArrayPair<'_, F>,
        lo: F,
        hi: F,
    ) -> Result<PipelineResult<F>, PipelineError> {
        let range = arrays.visible_range(lo, hi);
        debug!(
            "Detecting {} peaks on samples {}..{} of {}",
            self.mode,
            range.start,
            range.end,
            arrays.len()
        );
        self.detect_in_range(arrays.y, range)
    }
}

/// A builder for configuring [`PeakDetector`]
#[derive(Debug, Clone)]
pub struct PeakDetectorBuilder<F: Sample> {
    mode: DetectionMode,
    threshold: ThresholdParams<F>,
    wavelet: WaveletParams<F>,
}

impl<F: Sample> Default for PeakDetectorBuilder<F> {
    fn default() -> Self {
        Self {
            mode: DetectionMode::default(),
            threshold: ThresholdParams::default(),
            wavelet: WaveletParams::default(),
        }
    }
}

impl<F: Sample> PeakDetectorBuilder<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&mut self, mode: DetectionMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn min_height(&mut self, min_height: F) -> &mut Self {
        self.threshold.min_height = min_height;
        self
    }

    pub fn alpha(&mut self, alpha: F) -> &mut Self {
        self.threshold.alpha = alpha;
        self
    }

    pub fn scales<I: IntoIterator<Item = usize>>(&mut self, scales: I) -> &mut Self {
        self.wavelet.scales = scales.into_iter().collect();
        self
    }

    pub fn prominence_factor(&mut self, prominence_factor: F) -> &mut Self {
        self.wavelet.prominence_factor = prominence_factor;
        self
    }

    pub fn build(&self) -> PeakDetector<F> {
        PeakDetector::new(self.mode, self.threshold, self.wavelet.clone())
    }
}

impl<F: Sample> From<PeakDetectorBuilder<F>> for PeakDetector<F> {
    fn from(value: PeakDetectorBuilder<F>) -> Self {
        value.build()
    }
}

/// A convenience function that runs the default detector configuration over `signal`
/// using the mode named by `mode`, either `"threshold"` or `"wavelet"`.
pub fn detect_peaks<F: Sample>(
    signal: &[F],
    mode: &str,
) -> Result<PipelineResult<F>, PipelineError> {
    PeakDetector::default().detect_with_mode(signal, mode)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{gaussian_signal, sawtooth_islands, SCENARIO_A};
    use crate::width::{radius_rule, MIN_WIDTH};
    use rstest::rstest;

    fn rows(result: &PipelineResult<f64>) -> Vec<(usize, f64, i32, usize, usize)> {
        result
            .iter()
            .map(|r| {
                (
                    r.index,
                    r.value,
                    r.region_id,
                    r.region_width,
                    r.region_radius,
                )
            })
            .collect()
    }

    #[test_log::test]
    fn test_threshold_scenario() {
        let result = detect_peaks(&SCENARIO_A, "threshold").unwrap();
        assert_eq!(result.mode, DetectionMode::Threshold);
        assert_eq!(result.islands, vec![Island::new(2, 4), Island::new(7, 7)]);
        assert_eq!(
            result.local_max,
            vec![
                vec![LocalMaximum::new(2, 12.0)],
                vec![LocalMaximum::new(7, 20.0)]
            ]
        );
        assert_eq!(result.widths, vec![3, 3]);
        assert_eq!(result.radii, vec![2, 2]);
        assert_eq!(
            rows(&result),
            vec![(2, 12.0, 0, 3, 2), (7, 20.0, 1, 3, 2)]
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![0.0])]
    #[case(vec![9.99; 50])]
    #[case((0..100).map(|i| (i % 10) as f64).collect())]
    fn test_below_threshold_is_empty(#[case] signal: Vec<f64>) {
        let result = detect_peaks(&signal, "threshold").unwrap();
        assert!(result.islands.is_empty());
        assert!(result.local_max.is_empty());
        assert!(result.is_empty());
    }

    #[test_log::test]
    fn test_wavelet_scenario() {
        let signal = gaussian_signal(200, 99.5, 5.0, 50.0, 0.0);
        let result = detect_peaks(&signal, "wavelet").unwrap();
        assert_eq!(result.mode, DetectionMode::Wavelet);
        assert!(result.islands.is_empty());
        assert!(result.widths.is_empty());
        assert_eq!(result.len(), 1);
        let peak = result.kept_rows[0];
        assert_eq!(peak.value, signal[peak.index]);
        assert_eq!(peak.region_id, crate::peak::NO_REGION);
    }

    #[rstest]
    #[case(5.0)]
    #[case(50.0)]
    fn test_wavelet_ignores_threshold(#[case] amplitude: f64) {
        // The even-length kernels center the response half a sample to the right,
        // so a bump at 99.5 has a single apex at 100
        let signal = gaussian_signal(200, 99.5, 5.0, amplitude, 0.0);
        let detector = PeakDetector::builder()
            .mode(DetectionMode::Wavelet)
            .min_height(1000.0)
            .alpha(0.9)
            .build();
        let result = detector.detect(&signal).unwrap();
        assert_eq!(result.len(), 1);
        let peak = result.kept_rows[0];
        assert_eq!(peak.index, 100);
        assert_eq!(peak.value, signal[peak.index]);
    }

    #[test]
    fn test_builder_defaults_match_detector() {
        let built: PeakDetector<f32> = PeakDetectorBuilder::new().build();
        assert_eq!(built, PeakDetector::<f32>::default());
        let from_builder: PeakDetector<f64> = PeakDetectorBuilder::<f64>::default().into();
        assert_eq!(from_builder.mode, DetectionMode::Threshold);
        assert_eq!(from_builder.threshold, ThresholdParams::default());
        assert_eq!(from_builder.wavelet, WaveletParams::default());
    }

    #[rstest]
    #[case("Threshold")]
    #[case("")]
    #[case("cwt")]
    fn test_invalid_mode(#[case] mode: &str) {
        let err = detect_peaks(&SCENARIO_A, mode).unwrap_err();
        assert_eq!(err, PipelineError::InvalidMode(mode.to_string()));
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_invalid_scale() {
        let detector = PeakDetector::<f64>::builder()
            .mode(DetectionMode::Wavelet)
            .scales([0, 1, 2])
            .build();
        assert_eq!(
            detector.detect(&SCENARIO_A),
            Err(PipelineError::InvalidScale(0))
        );
    }

    #[test]
    fn test_mode_round_trip() {
        for mode in [DetectionMode::Threshold, DetectionMode::Wavelet] {
            assert_eq!(mode.to_string().parse::<DetectionMode>(), Ok(mode));
        }
    }

    #[test_log::test]
    #[test_log(default_log_filter = "trace")]
    fn test_threshold_invariants() {
        let signal = sawtooth_islands(600);
        let detector = PeakDetector::builder().min_height(20.0).alpha(0.6).build();
        let result = detector.detect(&signal).unwrap();
        assert!(!result.islands.is_empty());
        assert!(!result.is_empty());

        for pair in result.islands.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
        for (island, maxima) in result.islands.iter().zip(result.local_max.iter()) {
            assert!(signal[island.start..=island.end].iter().all(|v| *v >= 20.0));
            assert!(maxima.iter().all(|m| island.contains(m.index)));
        }
        for ((island, w), r) in result
            .islands
            .iter()
            .zip(result.widths.iter())
            .zip(result.radii.iter())
        {
            assert!(*w >= MIN_WIDTH);
            if island.len() >= MIN_WIDTH {
                assert!(*w <= island.len());
            }
            assert_eq!(*r, radius_rule(*w));
        }
        for (i, a) in result.kept_rows.iter().enumerate() {
            assert!(a.index < signal.len());
            for b in result.kept_rows[i + 1..].iter() {
                if a.region_id == b.region_id {
                    assert!(a.index.abs_diff(b.index) >= a.region_radius);
                }
            }
        }
        assert!(result
            .kept_rows
            .windows(2)
            .all(|w| (w[0].region_id, w[0].index) < (w[1].region_id, w[1].index)));
    }

    #[test]
    fn test_matches_sequential_composition() {
        let signal = sawtooth_islands(1000);
        let detector = PeakDetector::builder().min_height(15.0).build();
        let result = detector.detect_threshold(&signal);

        let islands = islands_of_activity(&signal, 15.0);
        let mut local_max = Vec::new();
        let mut stats = Vec::new();
        for island in islands.iter() {
            let maxima = find_local_maxima(&signal, island);
            stats.push(region_stats(&signal, island, &maxima, 0.5));
            local_max.push(maxima);
        }
        let kept = suppress(&flatten_candidates(&local_max), &stats);

        assert_eq!(result.islands, islands);
        assert_eq!(result.local_max, local_max);
        let indices: Vec<_> = result.iter().map(|r| r.index).collect();
        let expected: Vec<_> = kept.iter().map(|c| c.index).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_deterministic() {
        let signal = sawtooth_islands(800);
        let detector = PeakDetector::builder().min_height(12.0).build();
        let first = detector.detect(&signal).unwrap();
        let second = detector.detect(&signal).unwrap();
        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn test_detect_in_range() {
        let mut signal = vec![0.0; 20];
        signal.extend_from_slice(&SCENARIO_A);
        signal.extend(vec![0.0; 20]);

        let detector = PeakDetector::default();
        let result = detector.detect_in_range(&signal, 20..29).unwrap();
        assert_eq!(result.islands, vec![Island::new(22, 24), Island::new(27, 27)]);
        assert_eq!(result.local_max[1], vec![LocalMaximum::new(27, 20.0)]);
        assert_eq!(
            rows(&result),
            vec![(22, 12.0, 0, 3, 2), (27, 20.0, 1, 3, 2)]
        );

        let clamped = detector.detect_in_range(&signal, 25..1000).unwrap();
        assert_eq!(rows(&clamped), vec![(27, 20.0, 0, 3, 2)]);

        let empty = detector.detect_in_range(&signal, 1000..2000).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_detect_between() {
        let y: Vec<f64> = [vec![0.0; 10], SCENARIO_A.to_vec()].concat();
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64 * 0.25).collect();
        let arrays = ArrayPair::new(&x, &y).unwrap();
        let detector = PeakDetector::default();
        // Covers indices 12 through 16, the first island only
        let result = detector.detect_between(&arrays, 3.0, 4.0).unwrap();
        assert_eq!(rows(&result), vec![(12, 12.0, 0, 3, 2)]);
    }

    #[test]
    fn test_f32_signal() {
        let signal: Vec<f32> = SCENARIO_A.iter().map(|v| *v as f32).collect();
        let result = detect_peaks(&signal, "threshold").unwrap();
        let indices: Vec<_> = result.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 7]);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serialized_layout() {
        let result = detect_peaks(&SCENARIO_A, "threshold").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["mode"], "threshold");
        assert_eq!(value["W_by_island"], serde_json::json!([3, 3]));
        assert_eq!(value["R_by_island"], serde_json::json!([2, 2]));
        assert_eq!(value["kept_rows"][1]["W_region"], 3);
        assert_eq!(value["islands"][0]["start"], 2);
    }
}
