//! Remote tariff simulation: request assembly, debounce and staleness.
//!
//! Every edit of the draft bumps a generation counter. A simulation is only
//! sent once the draft has been quiet for the configured delay, and its
//! response is only kept if no edit happened since it was sent. Late answers
//! to superseded requests are dropped instead of overwriting newer state.
//!
//! A kept response also remembers the [`BookingDraft::revision`] it priced,
//! so it is never shown for a draft that changed without a `touch`.

use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::draft::BookingDraft;
use crate::gateway::{BookingGateway, GatewayError};
use crate::payload::StayPayload;

/// The stays to price, in draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub sejours: Vec<StayPayload>,
}

impl SimulationRequest {
    pub fn from_draft(draft: &BookingDraft) -> Self {
        Self {
            sejours: draft.stay_payloads(),
        }
    }
}

/// Authoritative totals computed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub ht: Decimal,
    pub tva: Decimal,
    pub ttc: Decimal,
}

/// A point on a monotonic clock.
///
/// `Instant` natively; a `Duration` since an arbitrary origin where
/// `Instant::now` is unavailable, as in the browser.
pub trait Timestamp: Copy {
    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later.
    fn since(self, earlier: Self) -> Duration;
}

impl Timestamp for Instant {
    fn since(self, earlier: Self) -> Duration {
        self.saturating_duration_since(earlier)
    }
}

impl Timestamp for Duration {
    fn since(self, earlier: Self) -> Duration {
        self.saturating_sub(earlier)
    }
}

/// Handle identifying the tracker generation and draft revision a request
/// was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    generation: u64,
    revision: u64,
}

/// Debounce plus generation tracking for simulation calls.
#[derive(Debug, Clone)]
pub struct SimulationTracker<T = Instant> {
    delay: Duration,
    generation: u64,
    pending_since: Option<T>,
    latest: Option<(u64, SimulationResponse)>,
}

impl<T: Timestamp> SimulationTracker<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending_since: None,
            latest: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.simulation_delay())
    }

    /// Record an edit of the draft. Any response received so far is stale.
    pub fn touch(&mut self, now: T) {
        self.generation += 1;
        self.pending_since = Some(now);
        self.latest = None;
    }

    /// A ticket for `draft` when it has been quiet long enough to simulate.
    pub fn due(&mut self, now: T, draft: &BookingDraft) -> Option<Ticket> {
        let since = self.pending_since?;
        if now.since(since) < self.delay {
            return None;
        }
        self.pending_since = None;
        Some(Ticket {
            generation: self.generation,
            revision: draft.revision(),
        })
    }

    /// Keep `response` if it answers the latest generation. Returns whether
    /// it was kept.
    pub fn accept(&mut self, ticket: Ticket, response: SimulationResponse) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale simulation response"
            );
            return false;
        }
        self.latest = Some((ticket.revision, response));
        true
    }

    /// The last response kept, whatever draft revision it priced.
    pub fn latest(&self) -> Option<&SimulationResponse> {
        self.latest.as_ref().map(|(_, response)| response)
    }

    /// The last response if it priced `draft` as it is now.
    pub fn latest_for(&self, draft: &BookingDraft) -> Option<&SimulationResponse> {
        match &self.latest {
            Some((revision, response)) if *revision == draft.revision() => Some(response),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Send a simulation through `gateway` if one is due.
    ///
    /// Returns `Ok(true)` when a fresh response was stored, `Ok(false)` when
    /// nothing was due or the draft is empty.
    pub fn poll<G: BookingGateway + ?Sized>(
        &mut self,
        now: T,
        draft: &BookingDraft,
        gateway: &G,
    ) -> Result<bool, GatewayError> {
        let Some(ticket) = self.due(now, draft) else {
            return Ok(false);
        };
        if draft.is_empty() {
            return Ok(false);
        }
        let request = SimulationRequest::from_draft(draft);
        let response = gateway.simulate(&request)?;
        Ok(self.accept(ticket, response))
    }
}
