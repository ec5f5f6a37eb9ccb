//! Tests for weekday sets and their wire formats.

use chrono::Weekday;
use sejour_engine::weekday::{label_fr, DayFlags};
use sejour_engine::{SejourError, WeekdaySet};

fn set(days: &[Weekday]) -> WeekdaySet {
    days.iter().copied().collect()
}

#[test]
fn csv_uses_monday_one_to_sunday_seven() {
    let days = set(&[Weekday::Sun, Weekday::Mon, Weekday::Wed]);
    assert_eq!(days.to_csv(), "1,3,7");
}

#[test]
fn csv_parse_tolerates_spaces_and_blanks() {
    let days = WeekdaySet::from_csv(" 1, 3,,5 ").unwrap();
    assert_eq!(days, set(&[Weekday::Mon, Weekday::Wed, Weekday::Fri]));

    assert!(WeekdaySet::from_csv("").unwrap().is_empty());
}

#[test]
fn csv_parse_rejects_out_of_range_and_garbage() {
    assert!(matches!(
        WeekdaySet::from_csv("1,8"),
        Err(SejourError::InvalidWeekdays(_))
    ));
    assert!(matches!(
        WeekdaySet::from_csv("0"),
        Err(SejourError::InvalidWeekdays(_))
    ));
    assert!(matches!(
        WeekdaySet::from_csv("lundi"),
        Err(SejourError::InvalidWeekdays(_))
    ));
}

#[test]
fn iteration_runs_monday_to_sunday() {
    let days = set(&[Weekday::Sat, Weekday::Tue, Weekday::Thu]);
    let order: Vec<Weekday> = days.iter().collect();
    assert_eq!(order, vec![Weekday::Tue, Weekday::Thu, Weekday::Sat]);
    assert_eq!(days.len(), 3);
}

#[test]
fn set_operations() {
    let a = set(&[Weekday::Mon, Weekday::Tue, Weekday::Wed]);
    let b = set(&[Weekday::Wed, Weekday::Thu]);

    assert_eq!(a.intersection(b), set(&[Weekday::Wed]));
    assert_eq!(a.union(b).len(), 4);
    assert_eq!(a.difference(b), set(&[Weekday::Mon, Weekday::Tue]));

    let mut c = a;
    c.remove(Weekday::Mon);
    c.insert(Weekday::Sun);
    assert!(!c.contains(Weekday::Mon));
    assert!(c.contains(Weekday::Sun));
}

#[test]
fn labels_are_french() {
    assert_eq!(label_fr(Weekday::Wed), "Mercredi");
    assert_eq!(set(&[Weekday::Thu, Weekday::Wed]).labels(), "Mercredi, Jeudi");
    assert_eq!(set(&[Weekday::Sun]).to_string(), "Dimanche");
}

#[test]
fn day_flags_map_to_weekdays() {
    let flags = DayFlags {
        lundi: true,
        vendredi: true,
        ..DayFlags::default()
    };
    let days = WeekdaySet::from(flags);
    assert_eq!(days, set(&[Weekday::Mon, Weekday::Fri]));
    assert_eq!(DayFlags::from(days), flags);
}

#[test]
fn day_flags_read_from_partial_json() {
    let flags: DayFlags = serde_json::from_str(r#"{"mardi":true,"dimanche":true}"#).unwrap();
    assert_eq!(
        WeekdaySet::from(flags),
        set(&[Weekday::Tue, Weekday::Sun])
    );
}

#[test]
fn serializes_as_day_numbers() {
    let days = set(&[Weekday::Mon, Weekday::Sun]);
    assert_eq!(serde_json::to_string(&days).unwrap(), "[1,7]");

    let back: WeekdaySet = serde_json::from_str("[2,3]").unwrap();
    assert_eq!(back, set(&[Weekday::Tue, Weekday::Wed]));

    assert!(serde_json::from_str::<WeekdaySet>("[9]").is_err());
}
