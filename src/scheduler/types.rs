use crate::calendar::{ClassifierWarning, DayKind};
use crate::model::WorkerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Mode de génération (exclusifs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// Roulement repos/garde par groupe de spécialité.
    DaysOff,
    /// Affectation aux types de poste.
    Shifts,
}

/// Compteur d'équité alimenté par un jour donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTrack {
    Regular,
    Weekend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDay {
    pub specialty: Option<String>,
    pub working: Vec<WorkerId>,
    pub resting: Vec<WorkerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub kind: DayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
    pub track: CreditTrack,
    pub groups: Vec<GroupDay>,
    /// Agents en congé, au repos d'office.
    pub on_leave: Vec<WorkerId>,
}

impl DayRecord {
    pub fn group(&self, specialty: Option<&str>) -> Option<&GroupDay> {
        self.groups.iter().find(|g| g.specialty.as_deref() == specialty)
    }

    pub fn working(&self) -> impl Iterator<Item = &WorkerId> {
        self.groups.iter().flat_map(|g| g.working.iter())
    }

    /// Repos du jour, congés compris.
    pub fn resting(&self) -> impl Iterator<Item = &WorkerId> {
        self.groups
            .iter()
            .flat_map(|g| g.resting.iter())
            .chain(self.on_leave.iter())
    }
}

/// Résultat du roulement repos/garde ; les crédits sont à reporter par l'appelant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub days: Vec<DayRecord>,
    pub credits: BTreeMap<WorkerId, f64>,
    pub weekend_credits: BTreeMap<WorkerId, f64>,
    pub warnings: Vec<ClassifierWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub date: NaiveDate,
    pub shift: String,
    pub specialty: Option<String>,
    pub worker: WorkerId,
    /// Affectation de repli (plafond ou enchaînement ignoré).
    pub forced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedAssignmentNotice {
    pub date: NaiveDate,
    pub shift: String,
    pub specialty: Option<String>,
    pub worker: WorkerId,
    pub weekly_hours: f64,
}

/// Semaine terminée sous le plancher horaire (indicatif, jamais imposé).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderFloorNotice {
    pub worker: WorkerId,
    pub week_start: NaiveDate,
    pub hours: f64,
    pub floor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    ForcedAssignment(ForcedAssignmentNotice),
    UnderFloor(UnderFloorNotice),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftOutcome {
    pub assignments: Vec<ShiftAssignment>,
    pub notices: Vec<Notice>,
    pub warnings: Vec<ClassifierWarning>,
    /// Heures de la dernière semaine traitée.
    pub hours: BTreeMap<WorkerId, f64>,
}

impl ShiftOutcome {
    pub fn forced_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.forced).count()
    }
}

pub(crate) fn specialty_label(specialty: Option<&str>) -> &str {
    specialty.unwrap_or("(none)")
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("no eligible weekday configured")]
    NoEligibleWeekdays,
    #[error("no eligible date between {start} and {end}")]
    NoEligibleDays { start: NaiveDate, end: NaiveDate },
    #[error("specialty {specialty} has {size} member(s), at least {required} required")]
    GroupTooSmall {
        specialty: String,
        size: usize,
        required: usize,
    },
    #[error("duplicate worker id: {0}")]
    DuplicateWorker(String),
    #[error("invalid credit for worker {0}: must be finite and >= 0")]
    InvalidCredit(String),
    #[error("invalid holiday credit multiplier: {0}")]
    InvalidMultiplier(f64),
    #[error("on-duty count per group must be at least 1")]
    InvalidOnDuty,
    #[error("no active worker in roster")]
    NoActiveWorkers,
    #[error("no shift type configured")]
    NoShiftTypes,
    #[error("invalid shift type {name}: {reason}")]
    InvalidShiftType { name: String, reason: &'static str },
    #[error("invalid weekly hour ceiling for {0}: must be positive")]
    InvalidCeiling(String),
    #[error("invalid week start {0}: expected 0-6 (0 = Sunday)")]
    InvalidWeekStart(u8),
    #[error("weekend weekdays share no day with the eligible weekdays")]
    WeekendNotEligible,
}
