use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::errors::GeneModelError;

/// The single coordinate convention used by every part of genebench:
/// 1-based positions, half-open `[start, end)`. Length is `end - start`.
pub const COORDINATE_CONVENTION: &str = "1-based, half-open [start, end)";

/// Represent a genomic range from [start, end)
/// Inclusive start, exclusive of end
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GenomicInterval {
    start: u32,
    end: u32,
}

impl GenomicInterval {
    /// Create a new interval. Positions are 1-based, so a start of 0 is
    /// rejected along with zero-length and reversed intervals.
    pub fn new(start: u32, end: u32) -> Result<Self, GeneModelError> {
        if start == 0 || start >= end {
            return Err(GeneModelError::InvalidInterval { start, end });
        }
        Ok(GenomicInterval { start, end })
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of bases covered by the interval.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Always false: construction rejects zero-length intervals.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of bases shared with `other`. Never negative.
    #[inline]
    pub fn overlap_length(&self, other: &GenomicInterval) -> u32 {
        std::cmp::min(self.end, other.end)
            .checked_sub(std::cmp::max(self.start, other.start))
            .unwrap_or(0)
    }

    /// Check if two intervals share at least one base
    #[inline]
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Number of bases covered by either interval. Widened to `u64` since two
    /// long intervals can cover more than `u32::MAX` bases together.
    #[inline]
    pub fn union_length(&self, other: &GenomicInterval) -> u64 {
        self.len() as u64 + other.len() as u64 - self.overlap_length(other) as u64
    }

    /// Intersection over union. A zero union resolves to 0 instead of
    /// dividing by zero.
    #[inline]
    pub fn iou(&self, other: &GenomicInterval) -> f64 {
        let union = self.union_length(other);
        if union == 0 {
            return 0.0;
        }
        self.overlap_length(other) as f64 / union as f64
    }

    /// Smallest interval covering both `self` and `other`.
    pub fn hull(&self, other: &GenomicInterval) -> GenomicInterval {
        GenomicInterval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Grow the interval by `flank` bases on each side, clamping the start
    /// at position 1.
    pub fn expand(&self, flank: u32) -> GenomicInterval {
        GenomicInterval {
            start: self.start.saturating_sub(flank).max(1),
            end: self.end.saturating_add(flank),
        }
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &GenomicInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Free-function form of [`GenomicInterval::overlap_length`].
pub fn overlap_length(a: &GenomicInterval, b: &GenomicInterval) -> u32 {
    a.overlap_length(b)
}

/// Free-function form of [`GenomicInterval::union_length`].
pub fn union_length(a: &GenomicInterval, b: &GenomicInterval) -> u64 {
    a.union_length(b)
}

/// Free-function form of [`GenomicInterval::iou`].
pub fn iou(a: &GenomicInterval, b: &GenomicInterval) -> f64 {
    a.iou(b)
}

impl Ord for GenomicInterval {
    #[inline]
    fn cmp(&self, other: &GenomicInterval) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Less => Ordering::Less,
            Ordering::Greater => Ordering::Greater,
            Ordering::Equal => self.end.cmp(&other.end),
        }
    }
}

impl PartialOrd for GenomicInterval {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<(u32, u32)> for GenomicInterval {
    type Error = GeneModelError;

    fn try_from(value: (u32, u32)) -> Result<Self, Self::Error> {
        GenomicInterval::new(value.0, value.1)
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GenomicInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RawInterval {
            Pair(u32, u32),
            Named { start: u32, end: u32 },
        }

        let (start, end) = match <RawInterval as serde::Deserialize>::deserialize(deserializer)? {
            RawInterval::Pair(start, end) => (start, end),
            RawInterval::Named { start, end } => (start, end),
        };
        GenomicInterval::new(start, end).map_err(serde::de::Error::custom)
    }
}
