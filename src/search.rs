use std::cmp::Ordering;

use num_traits::Float;

/// The insertion point of `q` in the sorted `array`, the first position whose
/// value is not less than `q`
pub fn binsearch<T: Float>(array: &[T], q: T) -> usize {
    array.partition_point(|x| x.partial_cmp(&q).unwrap_or(Ordering::Greater) == Ordering::Less)
}

/// The position just past the last value in the sorted `array` which is not
/// greater than `q`
pub fn binsearch_right<T: Float>(array: &[T], q: T) -> usize {
    array.partition_point(|x| x.partial_cmp(&q).unwrap_or(Ordering::Greater) != Ordering::Greater)
}

/// The half-open index range of the sorted `array` whose values lie in `[lo, hi]`
pub fn find_between<T: Float>(array: &[T], lo: T, hi: T) -> (usize, usize) {
    let lo_i = binsearch(array, lo);
    let hi_i = binsearch_right(array, hi);
    if lo_i > hi_i {
        (lo_i, lo_i)
    } else {
        (lo_i, hi_i)
    }
}
