//! Multiscale peak detection using a bank of Ricker (Mexican hat) wavelets.
//!
//! The signal is convolved with a Ricker wavelet at every requested scale, the
//! absolute responses are summed per sample, and peaks of that aggregate are
//! selected by prominence relative to its median. This does not depend on any
//! height threshold, so it copes with signals whose baseline drifts.
//!
//! The reported value of each peak is the input signal's value at the detected
//! index, never the transform's.
use std::ops::RangeInclusive;

use cfg_if::cfg_if;
use log::{debug, trace};
use num_traits::{Float, FromPrimitive};

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

use crate::arrayops::linspace;
use crate::peak::{KeptPeak, Sample};
use crate::statistics::median;

/// The scales used when none are specified
pub const DEFAULT_SCALES: RangeInclusive<usize> = 1..=49;
/// The fraction of the aggregate response's median a peak must be prominent by
pub const DEFAULT_PROMINENCE_FACTOR: f64 = 0.5;

/// A discrete Ricker wavelet of scale `width`, sampled at `10 * width` points
/// evenly spread over `[-5 * width, 5 * width]`.
///
/// $$ A \left(1 - \left(\frac{x}{w}\right)^2\right) e^{-\frac{(x/w)^2}{2}}, \quad A = \frac{2}{\sqrt{3w}\pi^{1/4}} $$
pub fn ricker_wavelet<F: Float + FromPrimitive>(width: usize) -> Vec<F> {
    let w = width as f64;
    let amplitude = 2.0 / ((3.0 * w).sqrt() * std::f64::consts::PI.powf(0.25));
    let points = 10 * width;
    let half = points as f64 / 2.0;
    linspace(-half, half, points)
        .into_iter()
        .map(|x| {
            let xsq = (x / w).powi(2);
            let v = amplitude * (1.0 - xsq) * (-xsq / 2.0).exp();
            F::from_f64(v).unwrap_or_else(F::zero)
        })
        .collect()
}

/// Convolve `signal` with `kernel`, returning the `signal.len()` central values
/// of the full convolution.
///
/// The output is aligned so that index `i` is `full[i + (kernel.len() - 1) / 2]`,
/// which holds whether or not the kernel is longer than the signal.
pub fn convolve_same<F: Float>(signal: &[F], kernel: &[F]) -> Vec<F> {
    if kernel.is_empty() {
        return vec![F::zero(); signal.len()];
    }
    (0..signal.len())
        .map(|i| convolve_same_at(signal, kernel, i))
        .collect()
}

/// The value of [`convolve_same`] at index `i`. `kernel` must not be empty.
#[inline]
fn convolve_same_at<F: Float>(signal: &[F], kernel: &[F], i: usize) -> F {
    let m = kernel.len();
    let k = i + (m - 1) / 2;
    let lo = k.saturating_sub(m - 1);
    let hi = k.min(signal.len() - 1);
    (lo..=hi).fold(F::zero(), |acc, j| acc + signal[j] * kernel[k - j])
}

/// Compute the continuous wavelet transform of `signal`, one row per scale in `scales`
pub fn cwt<F: Sample>(signal: &[F], scales: &[usize]) -> Vec<Vec<F>> {
    let transform = |w: &usize| convolve_same(signal, &ricker_wavelet::<F>(*w));
    cfg_if! {
        if #[cfg(feature = "parallelism")] {
            return scales.par_iter().map(transform).collect();
        } else {
            return scales.iter().map(transform).collect();
        }
    }
}

/// Sum the absolute value of every row of `matrix` at each column
pub fn absolute_sum<F: Float>(matrix: &[Vec<F>], n: usize) -> Vec<F> {
    let mut total = vec![F::zero(); n];
    for row in matrix {
        for (acc, v) in total.iter_mut().zip(row.iter()) {
            *acc = *acc + v.abs();
        }
    }
    total
}

/// The sum over `scales` of the absolute Ricker response at each sample of `signal`.
///
/// Equal to `absolute_sum(&cwt(signal, scales), signal.len())`, but only the
/// kernels and the accumulated sum are held in memory, never a row per scale.
pub fn cwt_absolute_sum<F: Sample>(signal: &[F], scales: &[usize]) -> Vec<F> {
    let kernels: Vec<Vec<F>> = scales
        .iter()
        .map(|w| ricker_wavelet::<F>(*w))
        .filter(|kernel| !kernel.is_empty())
        .collect();
    let column = |i: usize| {
        kernels.iter().fold(F::zero(), |acc, kernel| {
            acc + convolve_same_at(signal, kernel, i).abs()
        })
    };
    cfg_if! {
        if #[cfg(feature = "parallelism")] {
            return (0..signal.len()).into_par_iter().map(column).collect();
        } else {
            return (0..signal.len()).map(column).collect();
        }
    }
}

/// Find all strict local maxima of `x`, collapsing flat tops to the lower
/// midpoint of the run. The first and last samples are never maxima.
pub fn local_maxima_1d<F: Float>(x: &[F]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut i_ahead = i + 1;
            while i_ahead < i_max && x[i_ahead] == x[i] {
                i_ahead += 1;
            }
            if x[i_ahead] < x[i] {
                peaks.push((i + i_ahead - 1) / 2);
                i = i_ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// The prominence of the peak at `peak`: its height above the higher of the two
/// lowest values reached on either side before a strictly taller sample or the
/// edge of `x`.
pub fn peak_prominence<F: Float>(x: &[F], peak: usize) -> F {
    let height = x[peak];
    let left_min = x[..peak]
        .iter()
        .rev()
        .take_while(|v| **v <= height)
        .fold(height, |acc, v| acc.min(*v));
    let right_min = x[peak + 1..]
        .iter()
        .take_while(|v| **v <= height)
        .fold(height, |acc, v| acc.min(*v));
    height - left_min.max(right_min)
}

/// Select the local maxima of `x` whose prominence is at least `min_prominence`
pub fn find_prominent_peaks<F: Float>(x: &[F], min_prominence: F) -> Vec<usize> {
    local_maxima_1d(x)
        .into_iter()
        .filter(|p| peak_prominence(x, *p) >= min_prominence)
        .collect()
}

/// Detect peaks of `signal` from its Ricker wavelet transform over `scales`.
///
/// A peak of the aggregate response is kept when its prominence is at least
/// `prominence_factor` times the aggregate's median.
pub fn detect_wavelet_peaks<F: Sample>(
    signal: &[F],
    scales: &[usize],
    prominence_factor: F,
) -> Vec<KeptPeak<F>> {
    if signal.is_empty() {
        return Vec::new();
    }
    let cwt_sum = cwt_absolute_sum(signal, scales);
    let Some(mid) = median(&cwt_sum) else {
        return Vec::new();
    };
    let min_prominence = mid * prominence_factor;
    trace!(
        "Aggregated {} scales, median response {:?}, minimum prominence {:?}",
        scales.len(),
        mid,
        min_prominence
    );
    let peaks: Vec<KeptPeak<F>> = find_prominent_peaks(&cwt_sum, min_prominence)
        .into_iter()
        .map(|i| KeptPeak::unassigned(i, signal[i]))
        .collect();
    debug!("Wavelet detection kept {} peaks", peaks.len());
    peaks
}
