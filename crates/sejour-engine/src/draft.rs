//! The booking draft: stays being assembled before a single submission.
//!
//! The draft is the only owner of its stays. Its invariant is that no two
//! stays claim the same room over overlapping ranges; every mutation checks
//! it through [`overlaps`](crate::overlap::overlaps).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::duration::billable_units;
use crate::error::{Result, SejourError};
use crate::gateway::{BookingGateway, BookingReceipt};
use crate::overlap::overlaps;
use crate::payload::{BookingPayload, ClientPayload, StayPayload};
use crate::range::DateRange;
use crate::room::Room;
use crate::stay::{Stay, StayInput, StayIssue, StayState};
use crate::tariff::Tariff;
use crate::{RoomId, TariffId};

/// Draft-local stay identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StayId(pub u32);

impl fmt::Display for StayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The guest and billing party.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuestInfo {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Company or person invoiced instead of the guest.
    #[serde(default)]
    pub billed_to: Option<String>,
}

/// Rooms and tariffs as last read from the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
}

impl Inventory {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn tariff(&self, id: TariffId) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.id == id)
    }
}

/// Two stays of the same draft claiming one room over overlapping ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConflict {
    pub room_id: RoomId,
    pub first: StayId,
    pub second: StayId,
}

/// An in-progress reservation.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    config: EngineConfig,
    guest: GuestInfo,
    stays: Vec<Stay>,
    next_id: u32,
    revision: u64,
    submitted: Option<BookingReceipt>,
}

impl BookingDraft {
    pub fn new(guest: GuestInfo, config: EngineConfig) -> Self {
        Self {
            config,
            guest,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn guest(&self) -> &GuestInfo {
        &self.guest
    }

    pub fn set_guest(&mut self, guest: GuestInfo) {
        self.guest = guest;
    }

    pub fn stays(&self) -> &[Stay] {
        &self.stays
    }

    pub fn stay(&self, id: StayId) -> Option<&Stay> {
        self.stays.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.stays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stays.len()
    }

    /// Bumped by every change to the stays. A simulation answers the
    /// revision it was requested for.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The receipt once the booking has been accepted by the API.
    pub fn receipt(&self) -> Option<&BookingReceipt> {
        self.submitted.as_ref()
    }

    /// The stay that keeps `room_id` from being booked over `range`.
    pub fn blocking_stay(
        &self,
        room_id: RoomId,
        range: &DateRange,
        excluding: Option<StayId>,
    ) -> Option<&Stay> {
        self.stays
            .iter()
            .filter(|s| Some(s.id) != excluding)
            .find(|s| s.claims(room_id) && overlaps(&s.range, range))
    }

    /// True unless another stay already claims `room_id` over an overlapping
    /// range.
    pub fn room_is_available(
        &self,
        room_id: RoomId,
        range: &DateRange,
        excluding: Option<StayId>,
    ) -> bool {
        self.blocking_stay(room_id, range, excluding).is_none()
    }

    /// Every issue keeping `input` from being added, all at once so a form
    /// can flag each field. `excluding` is the stay being edited, if any.
    pub fn validate_input(
        &self,
        input: &StayInput,
        inventory: &Inventory,
        excluding: Option<StayId>,
    ) -> Vec<StayIssue> {
        let mut issues = Vec::new();
        let kind = input.schedule.kind();

        let range = match input.schedule.range(&self.config) {
            Ok(range) => {
                if billable_units(&range, kind, self.config.hour_clock) == 0 {
                    issues.push(StayIssue::EmptyDuration(kind));
                }
                Some(range)
            }
            Err(issue) => {
                issues.push(issue);
                None
            }
        };

        if input.room_type_id.is_none() {
            issues.push(StayIssue::MissingRoomType);
        }

        match input.tariff_id {
            None => issues.push(StayIssue::MissingTariff),
            Some(id) => match inventory.tariff(id) {
                None => issues.push(StayIssue::UnknownTariff(id)),
                Some(tariff) if tariff.kind != kind => {
                    issues.push(StayIssue::TariffKindMismatch {
                        expected: kind,
                        found: tariff.kind,
                    });
                }
                Some(_) => {}
            },
        }

        if input.occupants == 0 {
            issues.push(StayIssue::NoOccupants);
        }

        if input.rooms.is_empty() {
            issues.push(StayIssue::NoRooms);
        }

        for &room_id in &input.rooms {
            let Some(room) = inventory.room(room_id) else {
                issues.push(StayIssue::UnknownRoom(room_id));
                continue;
            };
            if let Some(expected) = input.room_type_id {
                if room.room_type_id != expected {
                    issues.push(StayIssue::WrongRoomType {
                        room: room_id,
                        expected,
                        found: room.room_type_id,
                    });
                }
            }
            if !room.functional {
                issues.push(StayIssue::RoomOutOfService(room_id));
            }
            if let Some(range) = &range {
                if let Some(blocker) = self.blocking_stay(room_id, range, excluding) {
                    issues.push(StayIssue::RoomUnavailable {
                        room: room_id,
                        stay: blocker.id,
                    });
                }
            }
        }

        issues
    }

    /// Validate `input` and turn it into one stay per selected room. The
    /// first stay takes over the id of the stay being edited, if any.
    fn build_stays(
        &mut self,
        input: StayInput,
        inventory: &Inventory,
        excluding: Option<StayId>,
    ) -> Result<Vec<Stay>> {
        if self.submitted.is_some() {
            return Err(SejourError::AlreadySubmitted);
        }
        let issues = self.validate_input(&input, inventory, excluding);
        if !issues.is_empty() {
            debug!(?issues, "stay rejected");
            return Err(SejourError::StayRejected(issues));
        }

        // Validation guarantees these are present.
        let (Ok(range), Some(room_type_id), Some(tariff_id)) = (
            input.schedule.range(&self.config),
            input.room_type_id,
            input.tariff_id,
        ) else {
            return Err(SejourError::StayRejected(vec![StayIssue::IncompleteDates]));
        };

        let kind = input.schedule.kind();
        let mut reused = excluding;
        let stays = input
            .rooms
            .iter()
            .map(|&room_id| {
                let id = reused.take().unwrap_or_else(|| {
                    self.next_id += 1;
                    StayId(self.next_id)
                });
                Stay {
                    id,
                    kind,
                    range,
                    room_type_id,
                    tariff_id,
                    rooms: [room_id].into_iter().collect(),
                    occupants: input.occupants,
                    note: input.note.clone(),
                    state: StayState::Validated,
                }
            })
            .collect();
        Ok(stays)
    }

    /// Add a stay form to the draft, one stay per selected room. Either every
    /// room is added or none is.
    pub fn add_stay(&mut self, input: StayInput, inventory: &Inventory) -> Result<Vec<StayId>> {
        let stays = self.build_stays(input, inventory, None)?;
        let ids = stays.iter().map(|s| s.id).collect();
        self.stays.extend(stays);
        self.revision += 1;
        Ok(ids)
    }

    /// Replace stay `id` with the edited form, keeping its position. The first
    /// resulting stay keeps `id`; extra rooms get fresh ids.
    pub fn update_stay(
        &mut self,
        id: StayId,
        input: StayInput,
        inventory: &Inventory,
    ) -> Result<Vec<StayId>> {
        let index = self
            .stays
            .iter()
            .position(|s| s.id == id)
            .ok_or(SejourError::StayNotFound(id))?;
        let stays = self.build_stays(input, inventory, Some(id))?;
        let ids = stays.iter().map(|s| s.id).collect();
        self.stays.splice(index..=index, stays);
        self.revision += 1;
        Ok(ids)
    }

    pub fn remove_stay(&mut self, id: StayId) -> Result<Stay> {
        if self.submitted.is_some() {
            return Err(SejourError::AlreadySubmitted);
        }
        let index = self
            .stays
            .iter()
            .position(|s| s.id == id)
            .ok_or(SejourError::StayNotFound(id))?;
        self.revision += 1;
        Ok(self.stays.remove(index))
    }

    /// Ranges during which `room_id` is claimed, earliest first.
    pub fn occupancy(&self, room_id: RoomId) -> Vec<DateRange> {
        let mut ranges: Vec<DateRange> = self
            .stays
            .iter()
            .filter(|s| s.claims(room_id))
            .map(|s| s.range)
            .collect();
        ranges.sort_by_key(|r| (r.start_instant(), r.end_instant()));
        ranges
    }

    /// Every pair of stays double-booking a room.
    pub fn conflicts(&self) -> Vec<RoomConflict> {
        let mut found = Vec::new();
        for (i, a) in self.stays.iter().enumerate() {
            for b in &self.stays[i + 1..] {
                if !overlaps(&a.range, &b.range) {
                    continue;
                }
                for &room_id in a.rooms.intersection(&b.rooms) {
                    found.push(RoomConflict {
                        room_id,
                        first: a.id,
                        second: b.id,
                    });
                }
            }
        }
        found
    }

    /// Per-stay payloads in draft order.
    pub fn stay_payloads(&self) -> Vec<StayPayload> {
        self.stays
            .iter()
            .map(|stay| StayPayload {
                date_arrivee: stay.range.start(),
                date_depart: stay.range.end(),
                heure_arrivee: stay.range.start_time(),
                heure_depart: stay.range.end_time(),
                type_piece_id: stay.room_type_id,
                tarif_id: stay.tariff_id,
                nombre_personnes: stay.occupants,
                nombre_unites: stay.units(&self.config),
                pieces_ids: stay.rooms.iter().copied().collect(),
                note: stay.note.clone(),
            })
            .collect()
    }

    /// The submission payload, or why the draft cannot be submitted yet.
    pub fn submission(&self) -> Result<BookingPayload> {
        if self.guest.full_name.trim().is_empty() {
            return Err(SejourError::MissingGuest);
        }
        if self.stays.is_empty() {
            return Err(SejourError::EmptyDraft);
        }
        if let Some(conflict) = self.conflicts().first() {
            return Err(SejourError::DoubleBooked {
                room_id: conflict.room_id,
                first: conflict.first,
                second: conflict.second,
            });
        }
        Ok(BookingPayload {
            client: ClientPayload {
                nom: self.guest.full_name.trim().to_string(),
                telephone: self.guest.phone.clone(),
                email: self.guest.email.clone(),
                facture_a: self.guest.billed_to.clone(),
            },
            sejours: self.stay_payloads(),
        })
    }

    /// Send the whole draft in one call. On failure nothing changes and the
    /// draft can be submitted again; on success every stay is `Submitted`.
    pub fn submit<G: BookingGateway + ?Sized>(&mut self, gateway: &G) -> Result<BookingReceipt> {
        if self.submitted.is_some() {
            return Err(SejourError::AlreadySubmitted);
        }
        let payload = self.submission()?;
        let receipt = gateway.submit_booking(&payload)?;

        info!(
            reservation = receipt.reservation_id,
            stays = self.stays.len(),
            "booking submitted"
        );
        for stay in &mut self.stays {
            stay.state = StayState::Submitted;
        }
        self.submitted = Some(receipt.clone());
        Ok(receipt)
    }
}
