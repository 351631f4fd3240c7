//! Parcours des dates éligibles d'une période et classification de chaque jour.

use crate::holiday::HolidayClassifier;
use crate::model::{ScheduleConfig, WeekdaySet};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Ordinary,
    Holiday,
    SpecialPeriod,
}

impl DayKind {
    pub fn is_ordinary(&self) -> bool {
        matches!(self, DayKind::Ordinary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayKind::Ordinary => "ordinary",
            DayKind::Holiday => "holiday",
            DayKind::SpecialPeriod => "special",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub kind: DayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
}

/// Incident non bloquant du classifieur : la date a été traitée comme ordinaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierWarning {
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarWalk {
    pub days: Vec<CalendarDay>,
    pub warnings: Vec<ClassifierWarning>,
}

/// Dates de `[start, end]` dont le jour de semaine est dans `weekdays`.
pub fn eligible_dates(start: NaiveDate, end: NaiveDate, weekdays: WeekdaySet) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| weekdays.contains(d.weekday()))
        .collect()
}

/// Parcourt la période de `config` ; sans classifieur tout est ordinaire.
pub fn walk(config: &ScheduleConfig, classifier: Option<&dyn HolidayClassifier>) -> CalendarWalk {
    let mut out = CalendarWalk::default();

    for date in eligible_dates(config.start, config.end, config.eligible_weekdays) {
        let (kind, holiday) = match classifier {
            None => (DayKind::Ordinary, None),
            Some(c) => match classify(c, date) {
                Ok(found) => found,
                Err(reason) => {
                    log_warn!(
                        %date,
                        %reason,
                        "holiday classifier trouble, treating day as ordinary"
                    );
                    out.warnings.push(ClassifierWarning { date, reason });
                    (DayKind::Ordinary, None)
                }
            },
        };
        out.days.push(CalendarDay {
            date,
            kind,
            holiday,
        });
    }

    out
}

fn classify(
    classifier: &dyn HolidayClassifier,
    date: NaiveDate,
) -> Result<(DayKind, Option<String>), String> {
    let holiday = classifier.is_holiday(date).map_err(|e| e.to_string())?;
    let special = classifier.is_special_period(date).map_err(|e| e.to_string())?;
    let name = classifier.describe_holiday(date).map_err(|e| e.to_string())?;

    let kind = if holiday {
        DayKind::Holiday
    } else if special {
        DayKind::SpecialPeriod
    } else {
        DayKind::Ordinary
    };

    if kind.is_ordinary() {
        if let Some(name) = name {
            return Err(format!(
                "inconsistent classifier data: '{name}' described but not flagged"
            ));
        }
    }

    Ok((kind, name))
}
