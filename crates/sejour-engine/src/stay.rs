//! Stays (`séjours`) and the form input they are built from.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::draft::StayId;
use crate::duration::billable_units;
use crate::range::DateRange;
use crate::tariff::TariffKind;
use crate::{RoomId, RoomTypeId, TariffId};

/// The kind-dependent part of a stay form.
///
/// Fields are optional because the form is validated while it is being
/// filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Billed per night. Missing times fall back to the configured
    /// check-in/check-out times.
    Nightly {
        arrival: Option<NaiveDate>,
        departure: Option<NaiveDate>,
        #[serde(default)]
        check_in: Option<NaiveTime>,
        #[serde(default)]
        check_out: Option<NaiveTime>,
    },
    /// Billed per started hour. The departure date defaults to the arrival
    /// date.
    Hourly {
        arrival: Option<NaiveDate>,
        arrival_time: Option<NaiveTime>,
        #[serde(default)]
        departure: Option<NaiveDate>,
        departure_time: Option<NaiveTime>,
    },
}

impl Schedule {
    pub fn nightly(arrival: NaiveDate, departure: NaiveDate) -> Self {
        Schedule::Nightly {
            arrival: Some(arrival),
            departure: Some(departure),
            check_in: None,
            check_out: None,
        }
    }

    pub fn hourly(
        arrival: NaiveDate,
        arrival_time: NaiveTime,
        departure: NaiveDate,
        departure_time: NaiveTime,
    ) -> Self {
        Schedule::Hourly {
            arrival: Some(arrival),
            arrival_time: Some(arrival_time),
            departure: Some(departure),
            departure_time: Some(departure_time),
        }
    }

    pub fn kind(&self) -> TariffKind {
        match self {
            Schedule::Nightly { .. } => TariffKind::Nightly,
            Schedule::Hourly { .. } => TariffKind::Hourly,
        }
    }

    /// The concrete range, or the issue keeping it from being complete.
    pub fn range(&self, config: &EngineConfig) -> Result<DateRange, StayIssue> {
        let built = match *self {
            Schedule::Nightly {
                arrival,
                departure,
                check_in,
                check_out,
            } => {
                let (Some(arrival), Some(departure)) = (arrival, departure) else {
                    return Err(StayIssue::IncompleteDates);
                };
                DateRange::with_times(
                    arrival,
                    check_in.unwrap_or(config.default_check_in),
                    departure,
                    check_out.unwrap_or(config.default_check_out),
                )
            }
            Schedule::Hourly {
                arrival,
                arrival_time,
                departure,
                departure_time,
            } => {
                let Some(arrival) = arrival else {
                    return Err(StayIssue::IncompleteDates);
                };
                let (Some(arrival_time), Some(departure_time)) = (arrival_time, departure_time)
                else {
                    return Err(StayIssue::IncompleteTimes);
                };
                DateRange::with_times(
                    arrival,
                    arrival_time,
                    departure.unwrap_or(arrival),
                    departure_time,
                )
            }
        };
        built.map_err(|e| StayIssue::InvalidRange(e.to_string()))
    }
}

/// A stay form as submitted by the stay-edit modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayInput {
    pub schedule: Schedule,
    #[serde(default)]
    pub room_type_id: Option<RoomTypeId>,
    #[serde(default)]
    pub tariff_id: Option<TariffId>,
    #[serde(default)]
    pub rooms: BTreeSet<RoomId>,
    #[serde(default = "default_occupants")]
    pub occupants: u32,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_occupants() -> u32 {
    1
}

impl StayInput {
    pub fn new(schedule: Schedule, room_type_id: RoomTypeId, tariff_id: TariffId) -> Self {
        Self {
            schedule,
            room_type_id: Some(room_type_id),
            tariff_id: Some(tariff_id),
            rooms: BTreeSet::new(),
            occupants: 1,
            note: None,
        }
    }

    pub fn with_rooms<I: IntoIterator<Item = RoomId>>(mut self, rooms: I) -> Self {
        self.rooms.extend(rooms);
        self
    }

    pub fn with_occupants(mut self, occupants: u32) -> Self {
        self.occupants = occupants;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A reason a stay form cannot be accepted, tied to the field it concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StayIssue {
    #[error("arrival and departure dates are required")]
    IncompleteDates,

    #[error("arrival and departure times are required for an hourly stay")]
    IncompleteTimes,

    #[error("{0}")]
    InvalidRange(String),

    #[error("the stay must last at least one {}", unit_name(.0))]
    EmptyDuration(TariffKind),

    #[error("a room type is required")]
    MissingRoomType,

    #[error("a tariff is required")]
    MissingTariff,

    #[error("tariff {0} is not known")]
    UnknownTariff(TariffId),

    #[error("tariff is {found:?} but the stay is {expected:?}")]
    TariffKindMismatch {
        expected: TariffKind,
        found: TariffKind,
    },

    #[error("select at least one room")]
    NoRooms,

    #[error("at least one occupant is required")]
    NoOccupants,

    #[error("room {0} is not known")]
    UnknownRoom(RoomId),

    #[error("room {room} is of type {found}, not {expected}")]
    WrongRoomType {
        room: RoomId,
        expected: RoomTypeId,
        found: RoomTypeId,
    },

    #[error("room {0} is out of service")]
    RoomOutOfService(RoomId),

    #[error("room {room} is already booked by stay {stay} over an overlapping period")]
    RoomUnavailable { room: RoomId, stay: StayId },
}

fn unit_name(kind: &TariffKind) -> &'static str {
    match kind {
        TariffKind::Nightly => "night",
        TariffKind::Hourly => "hour",
    }
}

impl StayIssue {
    /// The form field the issue is displayed next to.
    pub fn field(&self) -> &'static str {
        match self {
            StayIssue::IncompleteDates | StayIssue::InvalidRange(_) | StayIssue::EmptyDuration(_) => {
                "dates"
            }
            StayIssue::IncompleteTimes => "times",
            StayIssue::MissingRoomType => "room_type",
            StayIssue::MissingTariff
            | StayIssue::UnknownTariff(_)
            | StayIssue::TariffKindMismatch { .. } => "tariff",
            StayIssue::NoOccupants => "occupants",
            StayIssue::NoRooms
            | StayIssue::UnknownRoom(_)
            | StayIssue::WrongRoomType { .. }
            | StayIssue::RoomOutOfService(_)
            | StayIssue::RoomUnavailable { .. } => "rooms",
        }
    }
}

/// Lifecycle of a stay inside a booking draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StayState {
    /// Built from input, not yet checked against the draft.
    #[default]
    Draft,
    /// Complete and free of room conflicts.
    Validated,
    /// Sent to the API as part of the whole booking.
    Submitted,
}

/// One stay of a booking draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stay {
    pub id: StayId,
    pub kind: TariffKind,
    pub range: DateRange,
    pub room_type_id: RoomTypeId,
    pub tariff_id: TariffId,
    /// The rooms claimed. The draft fans multi-room input out, so stays it
    /// creates hold exactly one room.
    pub rooms: BTreeSet<RoomId>,
    pub occupants: u32,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub state: StayState,
}

impl Stay {
    pub fn claims(&self, room_id: RoomId) -> bool {
        self.rooms.contains(&room_id)
    }

    /// Nights or hours, depending on the tariff kind.
    pub fn units(&self, config: &EngineConfig) -> u32 {
        billable_units(&self.range, self.kind, config.hour_clock)
    }
}
