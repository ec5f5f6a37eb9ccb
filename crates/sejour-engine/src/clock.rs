//! Elapsed-time policies for hourly stays.

use chrono::{NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::SejourError;

/// How the time between arrival and departure is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawClockPolicy", into = "RawClockPolicy")]
pub enum ClockPolicy {
    /// Plain local wall-clock subtraction; DST transitions are ignored.
    #[default]
    WallClock,
    /// Absolute elapsed time, interpreting both instants in an IANA zone.
    /// Local times that fall in a DST gap shift forward past it; ambiguous
    /// times take the earlier instant.
    Zoned(Tz),
}

impl ClockPolicy {
    /// Parse an IANA timezone name into a `Zoned` policy.
    pub fn zoned(timezone: &str) -> Result<Self, SejourError> {
        timezone
            .parse::<Tz>()
            .map(ClockPolicy::Zoned)
            .map_err(|_| SejourError::InvalidTimezone(timezone.to_string()))
    }

    /// Time elapsed between two local instants under this policy.
    pub fn elapsed(&self, start: NaiveDateTime, end: NaiveDateTime) -> TimeDelta {
        match self {
            ClockPolicy::WallClock => end - start,
            ClockPolicy::Zoned(tz) => {
                let start_abs = resolve(tz, start);
                let end_abs = resolve(tz, end);
                end_abs - start_abs
            }
        }
    }
}

/// Map a local datetime to an absolute instant in `tz`.
fn resolve(tz: &Tz, local: NaiveDateTime) -> chrono::DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return dt.with_timezone(&Utc);
    }
    // Nonexistent local time: walk forward until we leave the gap.
    let mut shifted = local;
    for _ in 0..8 {
        shifted += TimeDelta::minutes(30);
        if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    local.and_utc()
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum RawClockPolicy {
    WallClock,
    Zoned { timezone: String },
}

impl TryFrom<RawClockPolicy> for ClockPolicy {
    type Error = SejourError;

    fn try_from(raw: RawClockPolicy) -> Result<Self, SejourError> {
        match raw {
            RawClockPolicy::WallClock => Ok(ClockPolicy::WallClock),
            RawClockPolicy::Zoned { timezone } => ClockPolicy::zoned(&timezone),
        }
    }
}

impl From<ClockPolicy> for RawClockPolicy {
    fn from(policy: ClockPolicy) -> Self {
        match policy {
            ClockPolicy::WallClock => RawClockPolicy::WallClock,
            ClockPolicy::Zoned(tz) => RawClockPolicy::Zoned {
                timezone: tz.name().to_string(),
            },
        }
    }
}
