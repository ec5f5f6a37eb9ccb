//! Night and hour counts for stays.
//!
//! Both counts are "incomplete input" tolerant: a range that is empty,
//! inverted or missing the times needed for hours yields 0 rather than an
//! error, so callers can render live feedback while a form is being filled.

use crate::clock::ClockPolicy;
use crate::range::DateRange;
use crate::tariff::TariffKind;

const SECONDS_PER_HOUR: i64 = 3600;

/// Number of calendar nights between the arrival and departure dates.
///
/// Times of day are ignored: arriving at 23:00 and leaving at 08:00 the next
/// day is one night.
pub fn nights(range: &DateRange) -> u32 {
    let days = (range.end() - range.start()).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Whole hours between arrival and departure on the local wall clock,
/// rounded up (1h01 bills as 2h). Returns 0 unless both times are set.
pub fn hours(range: &DateRange) -> u32 {
    hours_with(range, ClockPolicy::WallClock)
}

/// [`hours`] measured under an explicit [`ClockPolicy`].
pub fn hours_with(range: &DateRange, clock: ClockPolicy) -> u32 {
    if !range.has_times() {
        return 0;
    }
    let seconds = clock
        .elapsed(range.start_instant(), range.end_instant())
        .num_seconds();
    if seconds <= 0 {
        return 0;
    }
    let whole = (seconds + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR;
    u32::try_from(whole).unwrap_or(u32::MAX)
}

/// Billable units for a tariff kind: nights for nightly, hours for hourly.
pub fn billable_units(range: &DateRange, kind: TariffKind, clock: ClockPolicy) -> u32 {
    match kind {
        TariffKind::Nightly => nights(range),
        TariffKind::Hourly => hours_with(range, clock),
    }
}
