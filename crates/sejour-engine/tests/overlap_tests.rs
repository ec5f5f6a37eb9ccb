//! Tests for the overlap predicate.

use chrono::{NaiveDate, NaiveTime};
use sejour_engine::overlap::overlap_duration;
use sejour_engine::{find_conflicts, overlaps, DateRange};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn days(from: (i32, u32, u32), to: (i32, u32, u32)) -> DateRange {
    DateRange::dates(date(from.0, from.1, from.2), date(to.0, to.1, to.2)).unwrap()
}

fn slot(day: u32, start_hour: u32, end_hour: u32) -> DateRange {
    DateRange::with_times(
        date(2024, 7, day),
        NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
        date(2024, 7, day),
        NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap(),
    )
    .unwrap()
}

#[test]
fn back_to_back_ranges_do_not_overlap() {
    let a = days((2024, 1, 1), (2024, 1, 5));
    let b = days((2024, 1, 5), (2024, 1, 8));
    assert!(!overlaps(&a, &b));
    assert!(!overlaps(&b, &a));
}

#[test]
fn shared_night_overlaps() {
    let a = days((2024, 7, 10), (2024, 7, 13));
    let b = days((2024, 7, 12), (2024, 7, 15));
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
}

#[test]
fn contained_range_overlaps() {
    let outer = days((2024, 7, 1), (2024, 7, 31));
    let inner = days((2024, 7, 10), (2024, 7, 11));
    assert!(overlaps(&outer, &inner));
    assert!(overlaps(&inner, &outer));
}

#[test]
fn range_overlaps_itself_unless_degenerate() {
    let a = days((2024, 7, 10), (2024, 7, 13));
    assert!(overlaps(&a, &a));

    let empty = days((2024, 7, 10), (2024, 7, 10));
    assert!(!overlaps(&empty, &empty));
}

#[test]
fn disjoint_ranges_do_not_overlap() {
    let a = days((2024, 7, 1), (2024, 7, 3));
    let b = days((2024, 7, 20), (2024, 7, 22));
    assert!(!overlaps(&a, &b));
}

#[test]
fn hourly_slots_on_the_same_day() {
    assert!(overlaps(&slot(10, 9, 11), &slot(10, 10, 12)));
    assert!(!overlaps(&slot(10, 9, 10), &slot(10, 10, 12)));
}

#[test]
fn hourly_slot_against_whole_days() {
    // A date-only range ending on the 13th stops at midnight.
    let nights = days((2024, 7, 10), (2024, 7, 13));
    assert!(!overlaps(&nights, &slot(13, 9, 11)));
    assert!(overlaps(&nights, &slot(12, 9, 11)));
}

#[test]
fn overlap_duration_is_the_shared_span() {
    let shared = overlap_duration(&slot(10, 9, 12), &slot(10, 11, 14)).unwrap();
    assert_eq!(shared.num_minutes(), 60);

    assert!(overlap_duration(&slot(10, 9, 10), &slot(10, 10, 11)).is_none());
}

#[test]
fn find_conflicts_reports_indices() {
    let a = vec![slot(10, 9, 10), slot(10, 14, 15)];
    let b = vec![slot(10, 8, 9), slot(10, 14, 16)];

    let conflicts = find_conflicts(&a, &b);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].index_a, 1);
    assert_eq!(conflicts[0].index_b, 1);
    assert_eq!(conflicts[0].overlap_minutes, 60);
}

#[test]
fn find_conflicts_with_empty_list() {
    assert!(find_conflicts(&[slot(10, 9, 10)], &[]).is_empty());
}
