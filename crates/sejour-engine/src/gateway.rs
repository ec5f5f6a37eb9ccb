//! The boundary to the property-management API.
//!
//! The HTTP client itself lives outside this crate; anything implementing
//! [`BookingGateway`] can back a draft. Calls are made once: there is no
//! retry, the user re-triggers the action after an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::payload::BookingPayload;
use crate::room::RoomStateEntry;
use crate::simulation::{SimulationRequest, SimulationResponse};
use crate::RoomId;

/// Failure of a remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("resource not found")]
    NotFound,

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// The text shown in the notification area.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NotFound => "The requested item no longer exists.".to_string(),
            GatewayError::Rejected { message, .. } => message.clone(),
            GatewayError::Transport(_) => {
                "The server could not be reached. Please try again.".to_string()
            }
        }
    }
}

/// What the API returns once a booking is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub reservation_id: i64,
    #[serde(default)]
    pub reference: Option<String>,
}

pub trait BookingGateway {
    /// Price the stays of a draft.
    fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse, GatewayError>;

    /// Store the whole booking in one request.
    fn submit_booking(&self, payload: &BookingPayload) -> Result<BookingReceipt, GatewayError>;

    /// Service-state history of a room.
    fn room_history(&self, room_id: RoomId) -> Result<Vec<RoomStateEntry>, GatewayError>;
}

/// Treat a 404 on an auxiliary lookup as an empty result.
pub fn not_found_as_empty<T: Default>(result: Result<T, GatewayError>) -> Result<T, GatewayError> {
    match result {
        Err(GatewayError::NotFound) => Ok(T::default()),
        other => other,
    }
}

/// Room history, with a missing history read as none.
pub fn fetch_room_history<G: BookingGateway + ?Sized>(
    gateway: &G,
    room_id: RoomId,
) -> Result<Vec<RoomStateEntry>, GatewayError> {
    not_found_as_empty(gateway.room_history(room_id))
}

/// Log a gateway error and return the message to display for it.
pub fn report(context: &str, err: &GatewayError) -> String {
    error!(%err, context, "remote call failed");
    err.user_message()
}
