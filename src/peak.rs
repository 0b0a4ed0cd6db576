use std::fmt;
use std::fmt::Debug;

use num_traits::float::TotalOrder;
use num_traits::{Float, FromPrimitive};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The region id reported for peaks which were not found inside an island,
/// as in [`DetectionMode::Wavelet`](crate::DetectionMode::Wavelet).
pub const NO_REGION: i32 = -1;

/// The numeric requirements for a signal sample. Implemented for every
/// floating point type that [`num_traits`] knows about, e.g. `f32` and `f64`.
pub trait Sample: Float + FromPrimitive + TotalOrder + Debug + Send + Sync + 'static {}

impl<T> Sample for T where T: Float + FromPrimitive + TotalOrder + Debug + Send + Sync + 'static {}

/// A contiguous, inclusive index range of a signal whose samples all
/// meet the minimum height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Island {
    pub start: usize,
    pub end: usize,
}

impl Island {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The number of samples covered, always at least one
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A local maximum inside a single island
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalMaximum<F> {
    pub index: usize,
    pub value: F,
}

impl<F> LocalMaximum<F> {
    pub fn new(index: usize, value: F) -> Self {
        Self { index, value }
    }
}

/// A [`LocalMaximum`] tagged with the island it was found in, as fed to
/// [`suppress`](crate::suppress::suppress)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Candidate<F> {
    pub index: usize,
    pub value: F,
    pub region_id: usize,
}

impl<F> Candidate<F> {
    pub fn new(index: usize, value: F, region_id: usize) -> Self {
        Self {
            index,
            value,
            region_id,
        }
    }
}

/// Per-island shape statistics shared by every candidate in the island.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionStats {
    /// The estimated characteristic peak width
    pub width: usize,
    /// The minimum index separation between two kept peaks
    pub radius: usize,
}

/// A peak which survived suppression, annotated with its region's statistics.
///
/// Peaks from [`DetectionMode::Wavelet`](crate::DetectionMode::Wavelet) carry
/// [`NO_REGION`] and zero width and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeptPeak<F> {
    pub index: usize,
    pub value: F,
    pub region_id: i32,
    #[cfg_attr(feature = "serde", serde(rename = "W_region"))]
    pub region_width: usize,
    #[cfg_attr(feature = "serde", serde(rename = "R_region"))]
    pub region_radius: usize,
}

impl<F> KeptPeak<F> {
    pub fn new(
        index: usize,
        value: F,
        region_id: i32,
        region_width: usize,
        region_radius: usize,
    ) -> Self {
        Self {
            index,
            value,
            region_id,
            region_width,
            region_radius,
        }
    }

    /// Build a peak that does not belong to any island
    pub fn unassigned(index: usize, value: F) -> Self {
        Self::new(index, value, NO_REGION, 0, 0)
    }

    pub fn has_region(&self) -> bool {
        self.region_id != NO_REGION
    }
}

impl<F: fmt::Display> fmt::Display for KeptPeak<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "KeptPeak({}, {}, {}, {}, {})",
            self.index, self.value, self.region_id, self.region_width, self.region_radius
        )
    }
}
