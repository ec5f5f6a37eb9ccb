//! # sejour-engine
//!
//! Booking-draft logic for a hotel front desk: stay durations, room
//! double-booking detection, weekday tariff conflicts and the assembly of the
//! multi-stay reservation payload sent to the property-management API.
//!
//! Every screen that needs a night count, an hour count or an overlap test
//! calls into this crate instead of re-deriving it.
//!
//! ## Modules
//!
//! - [`range`]: `DateRange` (dates with optional times of day)
//! - [`clock`]: wall-clock vs zoned elapsed time for hourly stays
//! - [`duration`]: `nights` and `hours`
//! - [`overlap`]: the half-open overlap predicate and pairwise conflicts
//! - [`weekday`]: `WeekdaySet`, the `1..7` CSV wire format and `DayFlags`
//! - [`tariff`]: tariff grids, weekday conflict checking, detail payloads
//! - [`room`]: rooms and room availability against a draft
//! - [`stay`]: `StayInput`, `Stay` and stay validation issues
//! - [`draft`]: `BookingDraft`, the reservation aggregator
//! - [`pricing`]: totals and the local (approximate) estimate
//! - [`simulation`]: remote tariff simulation requests, debounce and staleness
//! - [`gateway`]: the trait standing in for the remote API
//! - [`payload`]: submission wire format
//! - [`config`]: `EngineConfig`
//! - [`error`]: error types

pub mod clock;
pub mod config;
pub mod draft;
pub mod duration;
pub mod error;
pub mod gateway;
pub mod overlap;
pub mod payload;
pub mod pricing;
pub mod range;
pub mod room;
pub mod simulation;
pub mod stay;
pub mod tariff;
pub mod weekday;

pub use clock::ClockPolicy;
pub use config::EngineConfig;
pub use draft::{BookingDraft, GuestInfo};
pub use duration::{hours, hours_with, nights};
pub use error::SejourError;
pub use overlap::{find_conflicts, overlaps};
pub use pricing::{compute_total, estimate, Quote, Totals};
pub use range::DateRange;
pub use room::{available_rooms, Room};
pub use stay::{Stay, StayInput, StayState};
pub use tariff::{conflicts, Tariff, TariffDetail, TariffKind};
pub use weekday::WeekdaySet;

/// Identifier of a room (`pièce`) as assigned by the API.
pub type RoomId = i64;
/// Identifier of a room type as assigned by the API.
pub type RoomTypeId = i64;
/// Identifier of a tariff grid as assigned by the API.
pub type TariffId = i64;
/// Identifier of a tariff detail as assigned by the API.
pub type DetailId = i64;
