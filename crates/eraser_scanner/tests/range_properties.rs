//! Property tests for range merging and offset lookups.

use eraser_scanner::{is_offset_in_ranges, merge_ranges, IgnoreRange};
use proptest::prelude::*;

fn arb_ranges() -> impl Strategy<Value = Vec<IgnoreRange>> {
    prop::collection::vec((0u32..200, 1u32..30), 0..24).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(start, len)| IgnoreRange::new(start, start + len))
            .collect()
    })
}

fn covered_by_input(ranges: &[IgnoreRange], offset: u32) -> bool {
    ranges.iter().any(|r| r.contains(offset))
}

proptest! {
    #[test]
    fn merge_is_idempotent(ranges in arb_ranges()) {
        let once = merge_ranges(ranges);
        let twice = merge_ranges(once.clone().into_vec());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_output_is_sorted_and_disjoint(ranges in arb_ranges()) {
        let merged = merge_ranges(ranges);
        for pair in merged.as_slice().windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn merge_preserves_coverage(ranges in arb_ranges()) {
        let merged = merge_ranges(ranges.clone());
        for offset in 0..240 {
            let in_merged = merged.iter().filter(|r| r.contains(offset)).count();
            prop_assert_eq!(in_merged, usize::from(covered_by_input(&ranges, offset)));
        }
    }

    #[test]
    fn lookup_matches_input_coverage(ranges in arb_ranges(), offset in 0u32..240) {
        let merged = merge_ranges(ranges.clone());
        prop_assert_eq!(
            is_offset_in_ranges(merged.as_slice(), offset),
            covered_by_input(&ranges, offset)
        );
    }
}
