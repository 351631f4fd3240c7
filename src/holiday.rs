//! Classification des jours fériés et périodes spéciales.
//!
//! Le moteur ne connaît que le trait [`HolidayClassifier`] ; les données
//! calendaires restent à l'extérieur (table CSV, service, stub de test).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("holiday classifier failed for {date}: {reason}")]
pub struct ClassifierError {
    pub date: NaiveDate,
    pub reason: String,
}

impl ClassifierError {
    pub fn new<R: Into<String>>(date: NaiveDate, reason: R) -> Self {
        Self {
            date,
            reason: reason.into(),
        }
    }
}

/// Capacité injectée : deux prédicats et un descripteur optionnel.
pub trait HolidayClassifier: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> Result<bool, ClassifierError>;
    fn is_special_period(&self, date: NaiveDate) -> Result<bool, ClassifierError>;
    fn describe_holiday(&self, date: NaiveDate) -> Result<Option<String>, ClassifierError>;
}

/// Aucun jour férié.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHolidays;

impl HolidayClassifier for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> Result<bool, ClassifierError> {
        Ok(false)
    }
    fn is_special_period(&self, _date: NaiveDate) -> Result<bool, ClassifierError> {
        Ok(false)
    }
    fn describe_holiday(&self, _date: NaiveDate) -> Result<Option<String>, ClassifierError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    Holiday,
    SpecialPeriod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub name: String,
    pub kind: HolidayKind,
}

/// Table explicite de dates (chargée depuis CSV par `io::import_holidays_csv`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayTable {
    entries: BTreeMap<NaiveDate, HolidayEntry>,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: Into<String>>(&mut self, date: NaiveDate, name: N, kind: HolidayKind) {
        // un férié l'emporte sur une période spéciale
        let shadowed = kind == HolidayKind::SpecialPeriod
            && self
                .entries
                .get(&date)
                .is_some_and(|e| e.kind == HolidayKind::Holiday);
        if !shadowed {
            self.entries.insert(
                date,
                HolidayEntry {
                    name: name.into(),
                    kind,
                },
            );
        }
    }

    /// Ajoute chaque date de `[start, end]` (bornes incluses).
    pub fn insert_range<N: Into<String>>(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        name: N,
        kind: HolidayKind,
    ) {
        let name = name.into();
        for date in start.iter_days().take_while(|d| *d <= end) {
            self.insert(date, name.clone(), kind);
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&HolidayEntry> {
        self.entries.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HolidayClassifier for HolidayTable {
    fn is_holiday(&self, date: NaiveDate) -> Result<bool, ClassifierError> {
        Ok(self
            .get(date)
            .is_some_and(|e| e.kind == HolidayKind::Holiday))
    }

    fn is_special_period(&self, date: NaiveDate) -> Result<bool, ClassifierError> {
        Ok(self
            .get(date)
            .is_some_and(|e| e.kind == HolidayKind::SpecialPeriod))
    }

    fn describe_holiday(&self, date: NaiveDate) -> Result<Option<String>, ClassifierError> {
        Ok(self.get(date).map(|e| e.name.clone()))
    }
}
