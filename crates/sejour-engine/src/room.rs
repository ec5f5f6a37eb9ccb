//! Rooms and room availability.
//!
//! Rooms are owned by the API; this crate only reads them to decide which
//! ones a stay may claim.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::draft::{BookingDraft, StayId};
use crate::range::DateRange;
use crate::{RoomId, RoomTypeId};

/// A rentable unit (`pièce`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub code: String,
    pub label: String,
    pub room_type_id: RoomTypeId,
    /// `false` while the room is out of service.
    pub functional: bool,
}

/// One entry of a room's service-state history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateEntry {
    pub room_id: RoomId,
    pub functional: bool,
    pub changed_on: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Functional rooms of `room_type_id` that no other stay of the draft claims
/// over an overlapping range.
///
/// `excluding` skips one stay, so a stay being edited does not block itself.
pub fn available_rooms<'a>(
    rooms: &'a [Room],
    draft: &BookingDraft,
    room_type_id: RoomTypeId,
    range: &DateRange,
    excluding: Option<StayId>,
) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|room| room.room_type_id == room_type_id && room.functional)
        .filter(|room| draft.room_is_available(room.id, range, excluding))
        .collect()
}
