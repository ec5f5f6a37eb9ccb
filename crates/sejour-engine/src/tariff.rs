//! Tariff grids and weekday conflict checking.
//!
//! A tariff (`tarif`) is a pricing grid made of details, each priced for a
//! subset of the seven weekdays. Within one grid a weekday belongs to at most
//! one detail. The rule is recurring, so the check is a plain set
//! intersection with no calendar dates involved.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, SejourError};
use crate::weekday::WeekdaySet;
use crate::{DetailId, TariffId};

/// Whether a tariff bills per calendar night or per elapsed hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffKind {
    /// `Nuitée`: priced per night.
    Nightly,
    /// `Passage`: priced per started hour.
    Hourly,
}

impl TariffKind {
    /// Recognise the labels used by existing tariff data ("Nuitée",
    /// "Passage"), case- and accent-insensitively.
    pub fn from_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_lowercase().replace(['é', 'è'], "e");
        match normalized.as_str() {
            "nuitee" | "nuit" | "nightly" => Ok(TariffKind::Nightly),
            "passage" | "heure" | "hourly" => Ok(TariffKind::Hourly),
            _ => Err(SejourError::UnknownTariffKind(label.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TariffKind::Nightly => "Nuitée",
            TariffKind::Hourly => "Passage",
        }
    }
}

/// A price applicable on a subset of the weekdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffDetail {
    /// `None` until the API has stored the detail.
    #[serde(default)]
    pub id: Option<DetailId>,
    pub code: String,
    pub label: String,
    pub price: Decimal,
    pub days: WeekdaySet,
}

/// Why a tariff detail cannot be saved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetailIssue {
    #[error("select at least one weekday")]
    NoDays,

    #[error("weekdays already covered by another detail: {0}")]
    DayConflict(WeekdaySet),

    #[error("code is required")]
    MissingCode,

    #[error("label is required")]
    MissingLabel,

    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),
}

impl DetailIssue {
    /// The form field the issue is displayed next to.
    pub fn field(&self) -> &'static str {
        match self {
            DetailIssue::NoDays | DetailIssue::DayConflict(_) => "days",
            DetailIssue::MissingCode => "code",
            DetailIssue::MissingLabel => "label",
            DetailIssue::NonPositivePrice(_) => "price",
        }
    }
}

/// The weekdays of `candidate` already claimed by any of `existing`.
pub fn conflicts<'a, I>(candidate: WeekdaySet, existing: I) -> WeekdaySet
where
    I: IntoIterator<Item = &'a TariffDetail>,
{
    let claimed = existing
        .into_iter()
        .fold(WeekdaySet::EMPTY, |acc, detail| acc.union(detail.days));
    candidate.intersection(claimed)
}

/// A pricing grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: TariffId,
    pub code: String,
    pub label: String,
    pub kind: TariffKind,
    #[serde(default)]
    pub details: Vec<TariffDetail>,
}

impl Tariff {
    /// Details other than the one being edited.
    fn others(&self, editing: Option<DetailId>) -> impl Iterator<Item = &TariffDetail> {
        self.details
            .iter()
            .filter(move |d| editing.is_none() || d.id != editing)
    }

    /// The weekday issue with saving `days` into this grid, if any.
    /// `editing` is the id of the detail being replaced.
    pub fn check_days(&self, days: WeekdaySet, editing: Option<DetailId>) -> Option<DetailIssue> {
        if days.is_empty() {
            return Some(DetailIssue::NoDays);
        }
        let clash = conflicts(days, self.others(editing));
        (!clash.is_empty()).then_some(DetailIssue::DayConflict(clash))
    }

    /// Every reason `candidate` cannot be saved into this grid; empty when
    /// it can.
    pub fn validate_detail(&self, candidate: &TariffDetail) -> Vec<DetailIssue> {
        let mut issues: Vec<DetailIssue> = self
            .check_days(candidate.days, candidate.id)
            .into_iter()
            .collect();

        if candidate.code.trim().is_empty() {
            issues.push(DetailIssue::MissingCode);
        }
        if candidate.label.trim().is_empty() {
            issues.push(DetailIssue::MissingLabel);
        }
        if candidate.price <= Decimal::ZERO {
            issues.push(DetailIssue::NonPositivePrice(candidate.price));
        }

        issues
    }

    /// Insert a new detail or replace the one with the same id.
    pub fn upsert_detail(&mut self, detail: TariffDetail) -> Result<()> {
        let issues = self.validate_detail(&detail);
        if !issues.is_empty() {
            debug!(tariff = self.id, ?issues, "tariff detail rejected");
            return Err(SejourError::DetailRejected(issues));
        }

        let existing = detail
            .id
            .and_then(|id| self.details.iter().position(|d| d.id == Some(id)));
        match existing {
            Some(index) => self.details[index] = detail,
            None => self.details.push(detail),
        }
        Ok(())
    }

    pub fn remove_detail(&mut self, id: DetailId) -> Result<TariffDetail> {
        let index = self
            .details
            .iter()
            .position(|d| d.id == Some(id))
            .ok_or(SejourError::DetailNotFound(id))?;
        Ok(self.details.remove(index))
    }

    /// The detail covering `day`, if any.
    pub fn detail_for(&self, day: Weekday) -> Option<&TariffDetail> {
        self.details.iter().find(|d| d.days.contains(day))
    }

    /// The unit price applicable on `date`.
    pub fn price_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.detail_for(date.weekday()).map(|d| d.price)
    }

    /// Weekdays no detail covers yet.
    pub fn uncovered_days(&self) -> WeekdaySet {
        let covered = self
            .details
            .iter()
            .fold(WeekdaySet::EMPTY, |acc, d| acc.union(d.days));
        WeekdaySet::ALL.difference(covered)
    }
}
