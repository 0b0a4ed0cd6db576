use num_traits::float::TotalOrder;
use num_traits::{Float, ToPrimitive};

/// Linearly interpolated percentile of an already sorted slice.
///
/// `percent` is a fraction in `[0, 1]`. Returns `None` for an empty slice.
pub fn percentile<T: Float + ToPrimitive>(values: &[T], percent: f64) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let k = (values.len() - 1) as f64 * percent;
    let f = k.floor();
    let c = k.ceil();
    if f == c {
        return Some(values[k as usize]);
    }
    let d0 = values[f as usize] * T::from(c - k)?;
    let d1 = values[c as usize] * T::from(k - f)?;
    Some(d0 + d1)
}

/// The median of unsorted `values`, averaging the two middle values for an even count.
/// NaN sorts above every other value.
pub fn median<T: Float + TotalOrder>(values: &[T]) -> Option<T> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile(&sorted, 0.5)
}

/// The median of unsorted integer `values`. For an even count this is the
/// floor of the mean of the two middle values.
pub fn median_floor(values: &[usize]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2)
    } else {
        Some(sorted[mid])
    }
}
