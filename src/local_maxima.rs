//! Plateau-aware local maximum search restricted to a single island.
//!
//! Samples outside of the island are never consulted. A neighbor which would
//! fall outside of the island is treated as negative infinity, so an island
//! boundary never disqualifies a maximum on its own.
//!
//! A run of equal consecutive values, a plateau, produces at most one
//! candidate located at the lower midpoint of the run. A single sample must be
//! strictly greater than its left neighbor but only greater than or equal to
//! its right neighbor.
use num_traits::Float;

use crate::peak::{Island, LocalMaximum};

/// Find the local maxima of `signal` within the bounds of `island`, in ascending index order.
pub fn find_local_maxima<F: Float>(signal: &[F], island: &Island) -> Vec<LocalMaximum<F>> {
    let start = island.start;
    let end = island.end;
    let neighbor = |i: Option<usize>| match i {
        Some(i) if start <= i && i <= end => signal[i],
        _ => F::neg_infinity(),
    };

    let mut candidates = Vec::new();
    let mut i = start;
    while i <= end {
        let value = signal[i];
        let plateau_left = i;
        let mut plateau_right = i;
        while plateau_right < end && signal[plateau_right + 1] == value {
            plateau_right += 1;
        }

        let left = neighbor(plateau_left.checked_sub(1));
        let right = neighbor(Some(plateau_right + 1));

        if plateau_right > plateau_left {
            if value > left && value > right {
                candidates.push(LocalMaximum::new(
                    (plateau_left + plateau_right) / 2,
                    value,
                ));
            }
            i = plateau_right + 1;
        } else {
            if value > left && value >= right {
                candidates.push(LocalMaximum::new(i, value));
            }
            i += 1;
        }
    }
    candidates
}
