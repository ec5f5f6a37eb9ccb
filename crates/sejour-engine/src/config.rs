//! Engine configuration.

use std::time::Duration;

use chrono::{NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::ClockPolicy;
use crate::error::Result;

/// Tunables shared by the draft, the estimate and the simulation tracker.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// VAT rate applied by the local estimate (0.18 = 18%).
    pub vat_rate: Decimal,
    /// Unit price used by the local estimate when no tariff detail covers a
    /// weekday. `None` leaves those units unpriced and marks the estimate
    /// incomplete.
    pub fallback_unit_price: Option<Decimal>,
    /// Quiet period after the last edit before a remote simulation is sent.
    pub simulation_delay_ms: u64,
    /// How hourly durations are measured.
    pub hour_clock: ClockPolicy,
    /// Arrival time assumed for nightly stays entered without one.
    pub default_check_in: NaiveTime,
    /// Departure time assumed for nightly stays entered without one.
    pub default_check_out: NaiveTime,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let noon = NaiveTime::MIN + TimeDelta::hours(12);
        Self {
            vat_rate: Decimal::new(18, 2),
            fallback_unit_price: None,
            simulation_delay_ms: 500,
            hour_clock: ClockPolicy::WallClock,
            default_check_in: noon,
            default_check_out: noon,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn simulation_delay(&self) -> Duration {
        Duration::from_millis(self.simulation_delay_ms)
    }
}
