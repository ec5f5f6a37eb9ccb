//! Wire formats exchanged with the property-management API.
//!
//! Field names follow the API (`dateArrivee`, `jourtarifapp`, ...), not Rust
//! conventions.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SejourError};
use crate::tariff::TariffDetail;
use crate::weekday::{DayFlags, WeekdaySet};
use crate::{DetailId, RoomId, RoomTypeId, TariffId};

/// One stay of a booking submission or simulation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayPayload {
    pub date_arrivee: NaiveDate,
    pub date_depart: NaiveDate,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub heure_arrivee: Option<NaiveTime>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub heure_depart: Option<NaiveTime>,
    pub type_piece_id: RoomTypeId,
    pub tarif_id: TariffId,
    pub nombre_personnes: u32,
    /// Nights or hours, depending on the tariff kind.
    pub nombre_unites: u32,
    pub pieces_ids: Vec<RoomId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The guest / billing party of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facture_a: Option<String>,
}

/// The whole booking, sent in a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub client: ClientPayload,
    pub sejours: Vec<StayPayload>,
}

/// A tariff detail as the API stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffDetailPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarifappid: Option<DetailId>,
    pub codetarifapp: String,
    pub libtarifapp: String,
    pub prixtarifapp: Decimal,
    pub tarifid: TariffId,
    /// Comma-joined day numbers, `1` = Monday .. `7` = Sunday.
    pub jourtarifapp: String,
}

impl TariffDetailPayload {
    pub fn from_detail(detail: &TariffDetail, tariff_id: TariffId) -> Self {
        Self {
            tarifappid: detail.id,
            codetarifapp: detail.code.clone(),
            libtarifapp: detail.label.clone(),
            prixtarifapp: detail.price,
            tarifid: tariff_id,
            jourtarifapp: detail.days.to_csv(),
        }
    }

    /// The stored days as the per-day flags the edit form binds to.
    pub fn day_flags(&self) -> Result<DayFlags> {
        Ok(WeekdaySet::from_csv(&self.jourtarifapp)?.into())
    }
}

impl TryFrom<TariffDetailPayload> for TariffDetail {
    type Error = SejourError;

    fn try_from(payload: TariffDetailPayload) -> Result<Self> {
        Ok(TariffDetail {
            id: payload.tarifappid,
            days: WeekdaySet::from_csv(&payload.jourtarifapp)?,
            code: payload.codetarifapp,
            label: payload.libtarifapp,
            price: payload.prixtarifapp,
        })
    }
}

/// `Option<NaiveTime>` as `"HH:MM"`; `"HH:MM:SS"` is accepted on read.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            NaiveTime::parse_from_str(&s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
