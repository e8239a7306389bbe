//! Merged ignore ranges and offset lookups.

use eraser_core::text::{TextPos, TextRange};
use std::cmp::Ordering;

/// A half-open `[start, end)` byte range that emoji reporting skips.
pub type IgnoreRange = TextRange;

/// Sorted, pairwise-disjoint ignore ranges.
///
/// Only `merge_ranges` builds this type, so `contains` can rely on the
/// ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRanges {
    ranges: Vec<IgnoreRange>,
}

impl IgnoreRanges {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Whether `offset` falls inside one of the ranges. O(log n).
    pub fn contains(&self, offset: TextPos) -> bool {
        is_offset_in_ranges(&self.ranges, offset)
    }

    pub fn as_slice(&self) -> &[IgnoreRange] {
        &self.ranges
    }

    pub fn into_vec(self) -> Vec<IgnoreRange> {
        self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IgnoreRange> {
        self.ranges.iter()
    }
}

impl<'a> IntoIterator for &'a IgnoreRanges {
    type Item = &'a IgnoreRange;
    type IntoIter = std::slice::Iter<'a, IgnoreRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

/// Sort ranges by `(start, end)` and fuse every overlapping or touching pair.
pub fn merge_ranges(mut ranges: Vec<IgnoreRange>) -> IgnoreRanges {
    if ranges.len() <= 1 {
        return IgnoreRanges { ranges };
    }

    ranges.sort_unstable();

    let mut merged = Vec::with_capacity(ranges.len());
    let mut current = ranges[0];
    for next in &ranges[1..] {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = *next;
        }
    }
    merged.push(current);

    IgnoreRanges { ranges: merged }
}

/// Binary search for `offset` in sorted, disjoint ranges.
///
/// Results are meaningless if `ranges` is not the output of a merge.
pub fn is_offset_in_ranges(ranges: &[IgnoreRange], offset: TextPos) -> bool {
    ranges
        .binary_search_by(|range| {
            if offset < range.start {
                Ordering::Greater
            } else if offset >= range.end {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: TextPos, end: TextPos) -> IgnoreRange {
        IgnoreRange::new(start, end)
    }

    #[test]
    fn test_merge_empty_and_single() {
        assert!(merge_ranges(vec![]).is_empty());
        assert_eq!(merge_ranges(vec![r(3, 7)]).as_slice(), &[r(3, 7)]);
    }

    #[test]
    fn test_merge_overlapping_and_touching() {
        let merged = merge_ranges(vec![r(10, 12), r(0, 4), r(4, 6), r(2, 3), r(11, 20)]);
        assert_eq!(merged.as_slice(), &[r(0, 6), r(10, 20)]);
    }

    #[test]
    fn test_merge_keeps_gaps() {
        let merged = merge_ranges(vec![r(5, 6), r(0, 4)]);
        assert_eq!(merged.as_slice(), &[r(0, 4), r(5, 6)]);
    }

    #[test]
    fn test_contains_is_half_open() {
        let ranges = merge_ranges(vec![r(2, 5), r(8, 9)]);
        assert!(!ranges.contains(1));
        assert!(ranges.contains(2));
        assert!(ranges.contains(4));
        assert!(!ranges.contains(5));
        assert!(ranges.contains(8));
        assert!(!ranges.contains(9));
        assert!(!IgnoreRanges::new().contains(0));
    }
}
