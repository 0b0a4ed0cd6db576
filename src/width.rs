//! Adaptive estimation of a characteristic peak width for each island, and the
//! rule converting that width into a suppression radius.
//!
//! Each local maximum is measured by walking outwards from its apex while the
//! signal stays at or above `alpha` times the apex value. The island's width is
//! the median of those measurements, so every candidate in an island shares it.
use num_traits::Float;

use crate::peak::{Island, LocalMaximum, RegionStats};
use crate::statistics::median_floor;

/// The smallest width an island may be assigned
pub const MIN_WIDTH: usize = 3;
/// The smallest suppression radius an island may be assigned
pub const MIN_RADIUS: usize = 2;

/// The number of samples around `index`, inclusive, that stay at or above
/// `alpha * value` without leaving `island`.
pub fn crossing_width<F: Float>(
    signal: &[F],
    island: &Island,
    index: usize,
    value: F,
    alpha: F,
) -> usize {
    let threshold = alpha * value;

    let left = signal[island.start..index]
        .iter()
        .rev()
        .take_while(|v| **v >= threshold)
        .count();
    let right = signal[(index + 1)..=island.end]
        .iter()
        .take_while(|v| **v >= threshold)
        .count();
    left + right + 1
}

/// Estimate the characteristic width of `island` from its local maxima.
///
/// An island without any local maxima falls back to its own length. The result is
/// clamped to `[MIN_WIDTH, island.len()]`, with the lower bound taking precedence
/// for islands shorter than [`MIN_WIDTH`].
pub fn island_width<F: Float>(
    signal: &[F],
    island: &Island,
    maxima: &[LocalMaximum<F>],
    alpha: F,
) -> usize {
    let widths: Vec<usize> = maxima
        .iter()
        .map(|m| crossing_width(signal, island, m.index, m.value, alpha))
        .collect();
    let width = median_floor(&widths).unwrap_or_else(|| island.len());
    width.min(island.len()).max(MIN_WIDTH)
}

/// Convert a characteristic width into the minimum index separation between
/// two kept peaks of the same island, `max(2, round(width / 3))`.
pub fn radius_rule(width: usize) -> usize {
    let radius = (width as f64 / 3.0).round() as usize;
    radius.max(MIN_RADIUS)
}

/// Compute the [`RegionStats`] of a single island
pub fn region_stats<F: Float>(
    signal: &[F],
    island: &Island,
    maxima: &[LocalMaximum<F>],
    alpha: F,
) -> RegionStats {
    let width = island_width(signal, island, maxima, alpha);
    RegionStats {
        width,
        radius: radius_rule(width),
    }
}
