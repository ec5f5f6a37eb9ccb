//! Weekday sets and their wire representations.
//!
//! The API numbers weekdays `1` (Monday) to `7` (Sunday) and stores a
//! detail's days as a comma-joined string (`"1,2,3"`). On read it hands back a
//! flag per French day name. [`WeekdaySet`] is the in-memory form of both.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SejourError};

/// Monday to Sunday, the iteration order used everywhere in this crate.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays, stored as a seven-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const ALL: WeekdaySet = WeekdaySet(0b111_1111);

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn intersection(&self, other: WeekdaySet) -> WeekdaySet {
        WeekdaySet(self.0 & other.0)
    }

    pub fn union(&self, other: WeekdaySet) -> WeekdaySet {
        WeekdaySet(self.0 | other.0)
    }

    pub fn difference(&self, other: WeekdaySet) -> WeekdaySet {
        WeekdaySet(self.0 & !other.0)
    }

    /// Days in Monday→Sunday order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(move |d| self.contains(*d))
    }

    /// `"1,3,5"`, the API's `jourtarifapp` encoding.
    pub fn to_csv(&self) -> String {
        self.iter()
            .map(|d| d.number_from_monday().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the API's comma-joined day numbers. Blank entries are ignored.
    pub fn from_csv(csv: &str) -> Result<WeekdaySet> {
        let mut set = WeekdaySet::EMPTY;
        for part in csv.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let number: u8 = trimmed
                .parse()
                .map_err(|_| SejourError::InvalidWeekdays(format!("not a number: '{}'", trimmed)))?;
            set.insert(weekday_from_number(number)?);
        }
        Ok(set)
    }

    /// French day labels joined with `", "`, e.g. `"Mercredi, Jeudi"`.
    pub fn labels(&self) -> String {
        self.iter().map(label_fr).collect::<Vec<_>>().join(", ")
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels())
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = SejourError;

    fn try_from(numbers: Vec<u8>) -> Result<Self> {
        numbers.into_iter().map(weekday_from_number).collect()
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().map(|d| d.number_from_monday() as u8).collect()
    }
}

/// `1` = Monday .. `7` = Sunday.
pub fn weekday_from_number(number: u8) -> Result<Weekday> {
    match number {
        1..=7 => Ok(WEEK[usize::from(number - 1)]),
        other => Err(SejourError::InvalidWeekdays(format!(
            "day number {} outside 1..7",
            other
        ))),
    }
}

/// The French label shown to front-desk users.
pub fn label_fr(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lundi",
        Weekday::Tue => "Mardi",
        Weekday::Wed => "Mercredi",
        Weekday::Thu => "Jeudi",
        Weekday::Fri => "Vendredi",
        Weekday::Sat => "Samedi",
        Weekday::Sun => "Dimanche",
    }
}

/// One flag per day name, as the API returns a detail's days on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayFlags {
    pub lundi: bool,
    pub mardi: bool,
    pub mercredi: bool,
    pub jeudi: bool,
    pub vendredi: bool,
    pub samedi: bool,
    pub dimanche: bool,
}

impl DayFlags {
    fn flags(&self) -> [bool; 7] {
        [
            self.lundi,
            self.mardi,
            self.mercredi,
            self.jeudi,
            self.vendredi,
            self.samedi,
            self.dimanche,
        ]
    }
}

impl From<DayFlags> for WeekdaySet {
    fn from(flags: DayFlags) -> Self {
        WEEK.into_iter()
            .zip(flags.flags())
            .filter_map(|(day, on)| on.then_some(day))
            .collect()
    }
}

impl From<WeekdaySet> for DayFlags {
    fn from(set: WeekdaySet) -> Self {
        DayFlags {
            lundi: set.contains(Weekday::Mon),
            mardi: set.contains(Weekday::Tue),
            mercredi: set.contains(Weekday::Wed),
            jeudi: set.contains(Weekday::Thu),
            vendredi: set.contains(Weekday::Fri),
            samedi: set.contains(Weekday::Sat),
            dimanche: set.contains(Weekday::Sun),
        }
    }
}
