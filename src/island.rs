//! Partition a signal into islands of activity, the maximal runs of samples
//! at or above a minimum height.
use num_traits::Float;

use crate::peak::Island;

/// Scan `signal` left to right, returning every maximal run of samples
/// `>= min_height` in increasing order.
pub fn islands_of_activity<F: Float>(signal: &[F], min_height: F) -> Vec<Island> {
    let mut islands = Vec::new();
    let mut start: Option<usize> = None;

    for (index, value) in signal.iter().enumerate() {
        match start {
            None if *value >= min_height => {
                start = Some(index);
            }
            Some(s) if *value < min_height => {
                islands.push(Island::new(s, index - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        islands.push(Island::new(s, signal.len() - 1));
    }
    islands
}
