//! The overlap predicate shared by room double-booking checks.
//!
//! Ranges are half-open: a stay ending exactly when another begins does NOT
//! overlap it (same-day checkout/checkin turnover).

use chrono::TimeDelta;

use crate::range::DateRange;

/// A detected overlap between two ranges from two lists.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeConflict {
    /// Index into the first list.
    pub index_a: usize,
    /// Index into the second list.
    pub index_b: usize,
    pub overlap_minutes: i64,
}

/// True when the two ranges share at least one instant.
///
/// Defined as `a.start < b.end && b.start < a.end` on wall-clock instants;
/// date-only ranges compare as whole days.
pub fn overlaps(a: &DateRange, b: &DateRange) -> bool {
    a.start_instant() < b.end_instant() && b.start_instant() < a.end_instant()
}

/// Length of the shared span, or `None` when the ranges do not overlap.
pub fn overlap_duration(a: &DateRange, b: &DateRange) -> Option<TimeDelta> {
    if !overlaps(a, b) {
        return None;
    }
    let start = a.start_instant().max(b.start_instant());
    let end = a.end_instant().min(b.end_instant());
    Some(end - start)
}

/// Find every pairwise overlap between two range lists.
pub fn find_conflicts(ranges_a: &[DateRange], ranges_b: &[DateRange]) -> Vec<RangeConflict> {
    let mut conflicts = Vec::new();

    for (index_a, a) in ranges_a.iter().enumerate() {
        for (index_b, b) in ranges_b.iter().enumerate() {
            if let Some(shared) = overlap_duration(a, b) {
                conflicts.push(RangeConflict {
                    index_a,
                    index_b,
                    overlap_minutes: shared.num_minutes(),
                });
            }
        }
    }

    conflicts
}
