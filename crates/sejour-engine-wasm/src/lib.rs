//! WASM bindings for sejour-engine.
//!
//! Exposes durations, the overlap predicate, weekday tariff conflicts and a
//! stateful booking draft to the front-end via `wasm-bindgen`. Complex values
//! cross the boundary as JSON strings. Validation problems are returned as
//! data (`{"ok": false, "issues": [...]}`) so forms can show them inline;
//! only malformed input throws.
//!
//! Times (`now_ms`) are milliseconds on any monotonic clock, typically
//! `performance.now()`. They drive the simulation debounce: every accepted
//! edit restarts the quiet period, `simulationDue` hands out the request to
//! send, and `acceptSimulation` keeps the answer only if nothing changed
//! since.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p sejour-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/sejour-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/sejour_engine_wasm.wasm
//! ```

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use sejour_engine::draft::{Inventory, StayId};
use sejour_engine::payload::TariffDetailPayload;
use sejour_engine::simulation::{SimulationRequest, SimulationResponse, SimulationTracker, Ticket};
use sejour_engine::stay::StayIssue;
use sejour_engine::tariff::DetailIssue;
use sejour_engine::{
    BookingDraft, DateRange, EngineConfig, GuestInfo, SejourError, StayInput, Tariff,
    TariffDetail, WeekdaySet,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct IssueDto {
    field: &'static str,
    message: String,
}

impl From<&StayIssue> for IssueDto {
    fn from(issue: &StayIssue) -> Self {
        Self {
            field: issue.field(),
            message: issue.to_string(),
        }
    }
}

impl From<&DetailIssue> for IssueDto {
    fn from(issue: &DetailIssue) -> Self {
        Self {
            field: issue.field(),
            message: issue.to_string(),
        }
    }
}

#[derive(Serialize)]
struct OutcomeDto {
    ok: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ids: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<IssueDto>,
}

impl OutcomeDto {
    fn accepted(ids: Vec<StayId>) -> Self {
        Self {
            ok: true,
            ids: ids.into_iter().map(|id| id.0).collect(),
            issues: Vec::new(),
        }
    }

    fn rejected(issues: Vec<IssueDto>) -> Self {
        Self {
            ok: false,
            ids: Vec::new(),
            issues,
        }
    }
}

#[derive(Serialize)]
struct ConflictDto {
    days: WeekdaySet,
    labels: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

/// Accepts `HH:MM` and `HH:MM:SS`.
fn parse_time(s: &str) -> Result<NaiveTime, JsValue> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| JsValue::from_str(&format!("Invalid time '{}': {}", s, e)))
}

fn from_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[derive(Serialize)]
struct SimulationCallDto {
    ticket: Ticket,
    request: SimulationRequest,
}

/// `now_ms` as a timestamp; negative and NaN read as 0.
fn at(now_ms: f64) -> Duration {
    Duration::from_millis(now_ms.max(0.0) as u64)
}

/// Turn a draft mutation result into an outcome, keeping validation issues
/// as data and throwing on anything else.
fn outcome(result: Result<Vec<StayId>, SejourError>) -> Result<String, JsValue> {
    match result {
        Ok(ids) => to_json(&OutcomeDto::accepted(ids)),
        Err(SejourError::StayRejected(issues)) => {
            to_json(&OutcomeDto::rejected(issues.iter().map(IssueDto::from).collect()))
        }
        Err(other) => Err(js_err(other)),
    }
}

// ---------------------------------------------------------------------------
// Stateless exports
// ---------------------------------------------------------------------------

/// Number of nights between two `YYYY-MM-DD` dates; 0 when incomplete.
#[wasm_bindgen]
pub fn nights(start: &str, end: &str) -> Result<u32, JsValue> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    Ok(DateRange::dates(start, end)
        .map(|r| sejour_engine::nights(&r))
        .unwrap_or(0))
}

/// Started hours between two date+time pairs; 0 when incomplete.
#[wasm_bindgen]
pub fn hours(start: &str, start_time: &str, end: &str, end_time: &str) -> Result<u32, JsValue> {
    let range = DateRange::with_times(
        parse_date(start)?,
        parse_time(start_time)?,
        parse_date(end)?,
        parse_time(end_time)?,
    );
    Ok(range.map(|r| sejour_engine::hours(&r)).unwrap_or(0))
}

/// Whether two ranges (`{start, end, start_time?, end_time?}` JSON) overlap.
#[wasm_bindgen(js_name = "rangesOverlap")]
pub fn ranges_overlap(a_json: &str, b_json: &str) -> Result<bool, JsValue> {
    let a: DateRange = from_json("range", a_json)?;
    let b: DateRange = from_json("range", b_json)?;
    Ok(sejour_engine::overlaps(&a, &b))
}

/// Weekdays of `candidate_csv` (`"3,4"`) already used by `details_json`
/// (an array of tariff detail payloads). Returns `{days, labels}`.
#[wasm_bindgen(js_name = "tariffConflicts")]
pub fn tariff_conflicts(candidate_csv: &str, details_json: &str) -> Result<String, JsValue> {
    let candidate = WeekdaySet::from_csv(candidate_csv).map_err(js_err)?;
    let payloads: Vec<TariffDetailPayload> = from_json("tariff details", details_json)?;
    let details = payloads
        .into_iter()
        .map(TariffDetail::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(js_err)?;

    let days = sejour_engine::conflicts(candidate, &details);
    to_json(&ConflictDto {
        days,
        labels: days.labels(),
    })
}

/// Check a tariff detail payload against its grid. Returns an outcome with
/// one issue per invalid field.
#[wasm_bindgen(js_name = "validateTariffDetail")]
pub fn validate_tariff_detail(tariff_json: &str, detail_json: &str) -> Result<String, JsValue> {
    let tariff: Tariff = from_json("tariff", tariff_json)?;
    let payload: TariffDetailPayload = from_json("tariff detail", detail_json)?;
    let detail = TariffDetail::try_from(payload).map_err(js_err)?;

    let issues: Vec<IssueDto> = tariff.validate_detail(&detail).iter().map(IssueDto::from).collect();
    if issues.is_empty() {
        to_json(&OutcomeDto::accepted(Vec::new()))
    } else {
        to_json(&OutcomeDto::rejected(issues))
    }
}

// ---------------------------------------------------------------------------
// Stateful draft
// ---------------------------------------------------------------------------

/// A booking draft held by the page for the lifetime of the booking modal.
#[wasm_bindgen(js_name = "BookingDraft")]
pub struct WasmDraft {
    inner: BookingDraft,
    inventory: Inventory,
    simulation: SimulationTracker<Duration>,
}

#[wasm_bindgen(js_class = "BookingDraft")]
impl WasmDraft {
    /// `inventory_json` is `{rooms, tariffs}`; `config_json` may be `"{}"`.
    #[wasm_bindgen(constructor)]
    pub fn new(inventory_json: &str, config_json: &str) -> Result<WasmDraft, JsValue> {
        let inventory: Inventory = from_json("inventory", inventory_json)?;
        let config = EngineConfig::from_json(config_json).map_err(js_err)?;
        let simulation = SimulationTracker::from_config(&config);
        Ok(WasmDraft {
            inner: BookingDraft::new(GuestInfo::default(), config),
            inventory,
            simulation,
        })
    }

    #[wasm_bindgen(js_name = "setGuest")]
    pub fn set_guest(&mut self, guest_json: &str) -> Result<(), JsValue> {
        self.inner.set_guest(from_json("guest", guest_json)?);
        Ok(())
    }

    /// Issues for a stay form without changing the draft. `editing` is the
    /// id of the stay being edited, if any.
    #[wasm_bindgen(js_name = "validateStay")]
    pub fn validate_stay(&self, input_json: &str, editing: Option<u32>) -> Result<String, JsValue> {
        let input: StayInput = from_json("stay", input_json)?;
        let issues = self
            .inner
            .validate_input(&input, &self.inventory, editing.map(StayId));
        if issues.is_empty() {
            to_json(&OutcomeDto::accepted(Vec::new()))
        } else {
            to_json(&OutcomeDto::rejected(issues.iter().map(IssueDto::from).collect()))
        }
    }

    #[wasm_bindgen(js_name = "addStay")]
    pub fn add_stay(&mut self, input_json: &str, now_ms: f64) -> Result<String, JsValue> {
        let input: StayInput = from_json("stay", input_json)?;
        let result = self.inner.add_stay(input, &self.inventory);
        if result.is_ok() {
            self.simulation.touch(at(now_ms));
        }
        outcome(result)
    }

    #[wasm_bindgen(js_name = "updateStay")]
    pub fn update_stay(&mut self, id: u32, input_json: &str, now_ms: f64) -> Result<String, JsValue> {
        let input: StayInput = from_json("stay", input_json)?;
        let result = self.inner.update_stay(StayId(id), input, &self.inventory);
        if result.is_ok() {
            self.simulation.touch(at(now_ms));
        }
        outcome(result)
    }

    #[wasm_bindgen(js_name = "removeStay")]
    pub fn remove_stay(&mut self, id: u32, now_ms: f64) -> Result<(), JsValue> {
        self.inner.remove_stay(StayId(id)).map_err(js_err)?;
        self.simulation.touch(at(now_ms));
        Ok(())
    }

    /// `{"ticket": ..., "request": ...}` once the draft has been quiet for
    /// the configured delay, `undefined` otherwise. Send `request` to the
    /// simulation endpoint and hand the answer back with its `ticket`.
    #[wasm_bindgen(js_name = "simulationDue")]
    pub fn simulation_due(&mut self, now_ms: f64) -> Result<Option<String>, JsValue> {
        let Some(ticket) = self.simulation.due(at(now_ms), &self.inner) else {
            return Ok(None);
        };
        if self.inner.is_empty() {
            return Ok(None);
        }
        let call = SimulationCallDto {
            ticket,
            request: SimulationRequest::from_draft(&self.inner),
        };
        to_json(&call).map(Some)
    }

    /// Keep a simulation answer `{ht, tva, ttc}`. Returns `false` when the
    /// draft changed after the request was issued.
    #[wasm_bindgen(js_name = "acceptSimulation")]
    pub fn accept_simulation(&mut self, ticket_json: &str, response_json: &str) -> Result<bool, JsValue> {
        let ticket: Ticket = from_json("ticket", ticket_json)?;
        let response: SimulationResponse = from_json("simulation", response_json)?;
        Ok(self.simulation.accept(ticket, response))
    }

    /// Totals to display: the simulation for the current draft if it has
    /// landed, the local estimate otherwise.
    pub fn quote(&self) -> Result<String, JsValue> {
        to_json(&sejour_engine::compute_total(
            &self.inner,
            &self.simulation,
            &self.inventory.tariffs,
        ))
    }

    /// The stays as JSON, in draft order.
    pub fn stays(&self) -> Result<String, JsValue> {
        to_json(&self.inner.stays())
    }

    /// The local, approximate HT/VAT/TTC quote.
    pub fn estimate(&self) -> Result<String, JsValue> {
        to_json(&sejour_engine::estimate(&self.inner, &self.inventory.tariffs))
    }

    /// The submission payload; throws when the draft cannot be submitted.
    #[wasm_bindgen(js_name = "submissionPayload")]
    pub fn submission_payload(&self) -> Result<String, JsValue> {
        let payload = self.inner.submission().map_err(js_err)?;
        to_json(&payload)
    }
}
