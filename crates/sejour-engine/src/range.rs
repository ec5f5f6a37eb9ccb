//! Date ranges with optional times of day.
//!
//! A `DateRange` is the half-open span `[start, end)` on the local wall clock.
//! Missing times read as midnight, so a date-only range covers whole days and
//! a stay ending on the 13th does not touch one starting on the 13th.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SejourError};

/// A span of calendar dates, optionally refined by arrival and departure times.
///
/// Invariant: `start <= end`, and when both times are present the start
/// instant is not after the end instant. A range whose instants coincide is
/// degenerate (zero nights, zero hours).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<NaiveTime>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default)]
    start_time: Option<NaiveTime>,
    #[serde(default)]
    end_time: Option<NaiveTime>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = SejourError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end, raw.start_time, raw.end_time)
    }
}

impl DateRange {
    /// Build a range, rejecting an end that precedes the start.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<Self> {
        if end < start {
            return Err(SejourError::InvalidRange(format!(
                "end {} precedes start {}",
                end, start
            )));
        }
        if let (Some(st), Some(et)) = (start_time, end_time) {
            if end.and_time(et) < start.and_time(st) {
                return Err(SejourError::InvalidRange(format!(
                    "departure {} {} precedes arrival {} {}",
                    end, et, start, st
                )));
            }
        }
        Ok(Self {
            start,
            end,
            start_time,
            end_time,
        })
    }

    /// Date-only range.
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::new(start, end, None, None)
    }

    /// Range with both arrival and departure times.
    pub fn with_times(
        start: NaiveDate,
        start_time: NaiveTime,
        end: NaiveDate,
        end_time: NaiveTime,
    ) -> Result<Self> {
        Self::new(start, end, Some(start_time), Some(end_time))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    /// True when both the arrival and the departure time are known.
    pub fn has_times(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }

    /// The arrival instant on the wall clock (midnight when no time is set).
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(self.start_time.unwrap_or(NaiveTime::MIN))
    }

    /// The departure instant on the wall clock (midnight when no time is set).
    pub fn end_instant(&self) -> NaiveDateTime {
        self.end.and_time(self.end_time.unwrap_or(NaiveTime::MIN))
    }

    pub fn is_degenerate(&self) -> bool {
        self.start_instant() >= self.end_instant()
    }

    /// The same dates with the given times, keeping any time already set.
    pub fn or_times(&self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time: self.start_time.or(Some(start_time)),
            end_time: self.end_time.or(Some(end_time)),
            ..*self
        }
    }

    /// The dates of each night covered, i.e. every day in `[start, end)`.
    pub fn night_dates(&self) -> impl Iterator<Item = NaiveDate> {
        let count = (self.end - self.start).num_days().max(0) as usize;
        self.start.iter_days().take(count)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if let Some(t) = self.start_time {
            write!(f, " {}", t.format("%H:%M"))?;
        }
        write!(f, "..{}", self.end)?;
        if let Some(t) = self.end_time {
            write!(f, " {}", t.format("%H:%M"))?;
        }
        Ok(())
    }
}
