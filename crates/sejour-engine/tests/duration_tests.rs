//! Tests for night and hour counts.

use chrono::{NaiveDate, NaiveTime};
use sejour_engine::duration::billable_units;
use sejour_engine::{hours, hours_with, nights, ClockPolicy, DateRange, SejourError, TariffKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn nights_counts_calendar_days() {
    let range = DateRange::dates(date(2024, 7, 10), date(2024, 7, 13)).unwrap();
    assert_eq!(nights(&range), 3);
}

#[test]
fn same_day_without_time_is_zero_nights() {
    let range = DateRange::dates(date(2024, 7, 10), date(2024, 7, 10)).unwrap();
    assert_eq!(nights(&range), 0);
    assert!(range.is_degenerate());
}

#[test]
fn nights_ignore_times_of_day() {
    // Late arrival, early departure: still one night.
    let range = DateRange::with_times(date(2024, 7, 10), time(23, 0), date(2024, 7, 11), time(8, 0))
        .unwrap();
    assert_eq!(nights(&range), 1);
}

#[test]
fn nights_across_month_end() {
    let range = DateRange::dates(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
    // 2024 is a leap year: 27, 28, 29 Feb and 1 Mar.
    assert_eq!(nights(&range), 4);
}

#[test]
fn ninety_minutes_bills_two_hours() {
    let range = DateRange::with_times(date(2024, 7, 10), time(10, 0), date(2024, 7, 10), time(11, 30))
        .unwrap();
    assert_eq!(hours(&range), 2);
}

#[test]
fn one_hour_one_minute_bills_two_hours() {
    let range = DateRange::with_times(date(2024, 7, 10), time(10, 0), date(2024, 7, 10), time(11, 1))
        .unwrap();
    assert_eq!(hours(&range), 2);
}

#[test]
fn exact_hours_are_not_rounded_up() {
    let range = DateRange::with_times(date(2024, 7, 10), time(9, 0), date(2024, 7, 10), time(12, 0))
        .unwrap();
    assert_eq!(hours(&range), 3);
}

#[test]
fn hours_span_midnight() {
    let range = DateRange::with_times(date(2024, 7, 10), time(22, 0), date(2024, 7, 11), time(1, 0))
        .unwrap();
    assert_eq!(hours(&range), 3);
}

#[test]
fn hours_need_both_times() {
    let range = DateRange::new(date(2024, 7, 10), date(2024, 7, 11), Some(time(10, 0)), None).unwrap();
    assert_eq!(hours(&range), 0);

    let date_only = DateRange::dates(date(2024, 7, 10), date(2024, 7, 11)).unwrap();
    assert_eq!(hours(&date_only), 0);
}

#[test]
fn same_instant_is_zero_hours() {
    let range = DateRange::with_times(date(2024, 7, 10), time(10, 0), date(2024, 7, 10), time(10, 0))
        .unwrap();
    assert_eq!(hours(&range), 0);
}

#[test]
fn end_before_start_is_rejected() {
    let err = DateRange::dates(date(2024, 7, 13), date(2024, 7, 10)).unwrap_err();
    assert!(matches!(err, SejourError::InvalidRange(_)));

    let err = DateRange::with_times(date(2024, 7, 10), time(14, 0), date(2024, 7, 10), time(9, 0))
        .unwrap_err();
    assert!(matches!(err, SejourError::InvalidRange(_)));
}

#[test]
fn inverted_range_rejected_when_deserializing() {
    let json = r#"{"start":"2024-07-13","end":"2024-07-10"}"#;
    assert!(serde_json::from_str::<DateRange>(json).is_err());

    let json = r#"{"start":"2024-07-10","end":"2024-07-13","start_time":"14:00:00"}"#;
    let range: DateRange = serde_json::from_str(json).unwrap();
    assert_eq!(range.start_time(), Some(time(14, 0)));
    assert_eq!(range.end_time(), None);
}

#[test]
fn zoned_clock_counts_absolute_time_over_spring_forward() {
    // Paris skips 02:00-03:00 on 2024-03-31.
    let range = DateRange::with_times(date(2024, 3, 31), time(1, 0), date(2024, 3, 31), time(4, 0))
        .unwrap();
    let paris = ClockPolicy::zoned("Europe/Paris").unwrap();

    assert_eq!(hours(&range), 3, "wall clock ignores the transition");
    assert_eq!(hours_with(&range, paris), 2);
}

#[test]
fn zoned_clock_counts_absolute_time_over_fall_back() {
    // Paris repeats 02:00-03:00 on 2024-10-27.
    let range = DateRange::with_times(date(2024, 10, 27), time(1, 0), date(2024, 10, 27), time(4, 0))
        .unwrap();
    let paris = ClockPolicy::zoned("Europe/Paris").unwrap();

    assert_eq!(hours(&range), 3);
    assert_eq!(hours_with(&range, paris), 4);
}

#[test]
fn zoned_clock_shifts_times_inside_the_gap() {
    // 02:30 does not exist in Paris that night; it is read as 03:00 CEST.
    let range = DateRange::with_times(date(2024, 3, 31), time(2, 30), date(2024, 3, 31), time(5, 0))
        .unwrap();
    let paris = ClockPolicy::zoned("Europe/Paris").unwrap();
    assert_eq!(hours_with(&range, paris), 2);
}

#[test]
fn unknown_timezone_is_an_error() {
    let err = ClockPolicy::zoned("Mars/Olympus_Mons").unwrap_err();
    assert!(matches!(err, SejourError::InvalidTimezone(_)));
}

#[test]
fn billable_units_follow_tariff_kind() {
    let range = DateRange::with_times(date(2024, 7, 10), time(12, 0), date(2024, 7, 12), time(12, 0))
        .unwrap();
    assert_eq!(billable_units(&range, TariffKind::Nightly, ClockPolicy::WallClock), 2);
    assert_eq!(billable_units(&range, TariffKind::Hourly, ClockPolicy::WallClock), 48);
}
