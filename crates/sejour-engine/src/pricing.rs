//! Booking totals.
//!
//! The authoritative price comes from the API's tariff simulation. Until it
//! has answered for the current draft, [`estimate`] gives an approximate
//! figure from the locally known tariff grids.

use std::ops::Add;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::draft::BookingDraft;
use crate::simulation::{SimulationResponse, SimulationTracker, Timestamp};
use crate::stay::Stay;
use crate::tariff::{Tariff, TariffKind};

/// Amounts before tax, tax, and tax included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub ht: Decimal,
    pub vat: Decimal,
    pub ttc: Decimal,
}

impl Totals {
    /// Totals for a pre-tax amount at `vat_rate`, rounded to cents.
    pub fn from_ht(ht: Decimal, vat_rate: Decimal) -> Self {
        let ht = ht.round_dp(2);
        let vat = (ht * vat_rate).round_dp(2);
        Self {
            ht,
            vat,
            ttc: ht + vat,
        }
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            ht: self.ht + rhs.ht,
            vat: self.vat + rhs.vat,
            ttc: self.ttc + rhs.ttc,
        }
    }
}

impl From<SimulationResponse> for Totals {
    fn from(response: SimulationResponse) -> Self {
        Totals {
            ht: response.ht,
            vat: response.tva,
            ttc: response.ttc,
        }
    }
}

/// Where a quote's figures come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// The API's simulation for the current draft.
    Remote,
    /// The local approximation; not binding.
    Estimate,
}

/// Totals to display for a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub totals: Totals,
    pub source: QuoteSource,
    /// `false` when some units had no known price.
    pub complete: bool,
}

/// Pre-tax amount of one stay and whether every unit had a price.
fn stay_amount(stay: &Stay, tariff: Option<&Tariff>, config: &EngineConfig) -> (Decimal, bool) {
    let rooms = Decimal::from(stay.rooms.len() as u64);
    let price_on = |date: NaiveDate| {
        tariff
            .and_then(|t| t.price_on(date))
            .or(config.fallback_unit_price)
    };

    match stay.kind {
        TariffKind::Nightly => {
            let mut amount = Decimal::ZERO;
            let mut complete = true;
            for night in stay.range.night_dates() {
                match price_on(night) {
                    Some(price) => amount += price,
                    None => complete = false,
                }
            }
            (amount * rooms, complete)
        }
        TariffKind::Hourly => {
            let hours = Decimal::from(stay.units(config));
            match price_on(stay.range.start()) {
                Some(price) => (price * hours * rooms, true),
                None => (Decimal::ZERO, false),
            }
        }
    }
}

/// Approximate totals from local tariff grids: each night priced by the
/// detail covering its weekday, hourly stays by their arrival weekday.
pub fn estimate(draft: &BookingDraft, tariffs: &[Tariff]) -> Quote {
    let config = draft.config();
    let mut ht = Decimal::ZERO;
    let mut complete = true;

    for stay in draft.stays() {
        let tariff = tariffs.iter().find(|t| t.id == stay.tariff_id);
        let (amount, priced) = stay_amount(stay, tariff, config);
        ht += amount;
        complete &= priced;
    }

    Quote {
        totals: Totals::from_ht(ht, config.vat_rate),
        source: QuoteSource::Estimate,
        complete,
    }
}

/// The remote simulation for the current draft if it has landed, the local
/// estimate otherwise. A simulation of an earlier revision of the draft is
/// never used.
pub fn compute_total<T: Timestamp>(
    draft: &BookingDraft,
    tracker: &SimulationTracker<T>,
    tariffs: &[Tariff],
) -> Quote {
    if let Some(response) = tracker.latest_for(draft) {
        return Quote {
            totals: (*response).into(),
            source: QuoteSource::Remote,
            complete: true,
        };
    }
    if !draft.is_empty() {
        warn!(stays = draft.len(), "no simulation yet, showing local estimate");
    }
    estimate(draft, tariffs)
}
