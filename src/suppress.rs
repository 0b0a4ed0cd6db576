//! Region-local non-maximum suppression with a single global ranking.
//!
//! Candidates from every island are ranked together, tallest first with the
//! earlier index winning ties, and accepted greedily. A candidate is rejected
//! only by an already kept candidate from the same island that is closer than
//! that island's radius. This must run once over the merged candidate list:
//! suppressing each island independently and merging afterwards would not be
//! equivalent in general.
use std::cmp::Ordering;

use num_traits::float::TotalOrder;
use num_traits::Float;

use crate::peak::{Candidate, LocalMaximum, RegionStats};

/// Tag each island's local maxima with the island's position, flattening them
/// into a single list in island order
pub fn flatten_candidates<F: Float>(local_max: &[Vec<LocalMaximum<F>>]) -> Vec<Candidate<F>> {
    local_max
        .iter()
        .enumerate()
        .flat_map(|(region_id, maxima)| {
            maxima
                .iter()
                .map(move |m| Candidate::new(m.index, m.value, region_id))
        })
        .collect()
}

fn rank<F: Float + TotalOrder>(a: &Candidate<F>, b: &Candidate<F>) -> Ordering {
    b.value
        .total_cmp(&a.value)
        .then_with(|| a.index.cmp(&b.index))
}

/// Greedily keep the tallest `candidates` which are at least their region's
/// radius away from every kept candidate of the same region.
///
/// The result is sorted by `(region_id, index)`.
///
/// # Panics
/// If a candidate's `region_id` is not a valid index into `stats`
pub fn suppress<F: Float + TotalOrder>(
    candidates: &[Candidate<F>],
    stats: &[RegionStats],
) -> Vec<Candidate<F>> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(rank);

    let mut kept_by_region: Vec<Vec<usize>> = vec![Vec::new(); stats.len()];
    let mut kept: Vec<Candidate<F>> = Vec::new();

    for cand in ranked {
        let radius = stats[cand.region_id].radius;
        let neighbors = &mut kept_by_region[cand.region_id];
        if neighbors
            .iter()
            .all(|index| index.abs_diff(cand.index) >= radius)
        {
            neighbors.push(cand.index);
            kept.push(cand);
        }
    }

    kept.sort_by(|a, b| {
        a.region_id
            .cmp(&b.region_id)
            .then_with(|| a.index.cmp(&b.index))
    });
    kept
}
