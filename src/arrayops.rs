use std::ops::Range;

use num_traits::Float;

use crate::pipeline::PipelineError;
use crate::search::find_between;

/// `num` evenly spaced values from `start` to `stop`, both ends included.
pub fn linspace<T: Float>(start: T, stop: T, num: usize) -> Vec<T> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / T::from(num - 1).unwrap_or_else(T::one);
            (0..num)
                .map(|i| start + T::from(i).unwrap_or_else(T::zero) * step)
                .collect()
        }
    }
}

/// A borrowed pair of coordinate and value arrays of equal length, as handed
/// over by a data loader. Only `y` is ever used as the signal.
#[derive(Debug, Clone, Copy)]
pub struct ArrayPair<'a, F: Float> {
    pub x: &'a [F],
    pub y: &'a [F],
}

impl<'a, F: Float> ArrayPair<'a, F> {
    /// Pair `x` with `y`, failing with [`PipelineError::ShapeMismatch`] when
    /// their lengths differ
    pub fn new(x: &'a [F], y: &'a [F]) -> Result<Self, PipelineError> {
        if x.len() != y.len() {
            return Err(PipelineError::ShapeMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// The index range of samples whose coordinate lies in `[lo, hi]`
    pub fn visible_range(&self, lo: F, hi: F) -> Range<usize> {
        visible_range(self.x, lo, hi)
    }

    pub fn get(&self, index: usize) -> Option<(F, F)> {
        Some((*self.x.get(index)?, *self.y.get(index)?))
    }
}

/// Map an axis window `[lo, hi]` on the sorted coordinate array `x` to the
/// half-open index range of samples inside it. The bounds are swapped if given
/// in reverse order.
pub fn visible_range<F: Float>(x: &[F], lo: F, hi: F) -> Range<usize> {
    let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
    let (start, end) = find_between(x, lo, hi);
    start..end
}
