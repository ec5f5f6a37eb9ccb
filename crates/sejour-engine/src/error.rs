//! Error types for sejour-engine operations.

use thiserror::Error;

use crate::draft::StayId;
use crate::gateway::GatewayError;
use crate::stay::StayIssue;
use crate::tariff::DetailIssue;
use crate::{DetailId, RoomId, TariffId};

#[derive(Error, Debug)]
pub enum SejourError {
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid weekday list: {0}")]
    InvalidWeekdays(String),

    #[error("Unknown tariff kind: {0}")]
    UnknownTariffKind(String),

    #[error("Tariff detail rejected: {}", join_issues(.0))]
    DetailRejected(Vec<DetailIssue>),

    #[error("Stay rejected: {}", join_issues(.0))]
    StayRejected(Vec<StayIssue>),

    #[error("Stay {0} is not part of the draft")]
    StayNotFound(StayId),

    #[error("Tariff detail {0} does not exist")]
    DetailNotFound(DetailId),

    #[error("Tariff {0} is not known")]
    TariffNotFound(TariffId),

    #[error("Booking draft has no stays")]
    EmptyDraft,

    #[error("Guest name is required")]
    MissingGuest,

    #[error("Room {room_id} is double-booked by stays {first} and {second}")]
    DoubleBooked {
        room_id: RoomId,
        first: StayId,
        second: StayId,
    },

    #[error("Booking has already been submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn join_issues<T: ToString>(issues: &[T]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, SejourError>;
