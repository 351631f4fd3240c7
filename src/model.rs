use crate::scheduler::RotationOutcome;
use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour Worker
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rôle dans le roulement : un agent en congé ne travaille jamais mais
/// accumule du crédit comme s'il était au repos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    #[default]
    Active,
    LeaveOnly,
}

/// Mode de garde (rotation de postes uniquement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyMode {
    #[default]
    Standard,
    /// Garde de 24h : peut enchaîner des postes adjacents le même jour.
    Continuous24h,
}

/// Agent du roulement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    /// Crédit d'équité reporté d'un roulement à l'autre.
    #[serde(default)]
    pub credit: f64,
    /// Second compteur, alimenté par les jours de `weekend_weekdays`.
    #[serde(default)]
    pub weekend_credit: f64,
    /// Ordre d'inscription (0 = pas encore inscrit), sert uniquement au départage.
    #[serde(default)]
    pub position: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub role: WorkerRole,
    #[serde(default)]
    pub duty: DutyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hour_ceiling: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hour_floor: Option<f64>,
}

fn default_active() -> bool {
    true
}

impl Worker {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: WorkerId::random(),
            name: name.into(),
            specialty: None,
            credit: 0.0,
            weekend_credit: 0.0,
            position: 0,
            active: true,
            role: WorkerRole::Active,
            duty: DutyMode::Standard,
            weekly_hour_ceiling: None,
            weekly_hour_floor: None,
        }
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = WorkerId::new(id);
        self
    }

    pub fn with_specialty<S: Into<String>>(mut self, specialty: S) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn with_credit(mut self, credit: f64) -> Self {
        self.credit = credit;
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    pub fn with_role(mut self, role: WorkerRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_duty(mut self, duty: DutyMode) -> Self {
        self.duty = duty;
        self
    }

    /// Participe au tirage repos/garde (actif et pas en congé).
    pub fn is_rotating(&self) -> bool {
        self.active && self.role == WorkerRole::Active
    }
}

/// Type de poste (matin, après-midi...) et sa place dans l'ordre cyclique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftType {
    pub name: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub duration_hours: f64,
    pub cycle_index: u32,
}

impl ShiftType {
    /// Crée un type de poste ; sans durée explicite, elle est déduite des
    /// horaires (une fin avant le début passe minuit).
    pub fn new<N: Into<String>>(
        name: N,
        start: NaiveTime,
        end: NaiveTime,
        duration_hours: Option<f64>,
        cycle_index: u32,
    ) -> Result<Self, String> {
        let duration_hours = duration_hours.unwrap_or_else(|| span_hours(start, end));
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return Err("shift duration must be positive".to_string());
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
            duration_hours,
            cycle_index,
        })
    }
}

fn span_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let start_secs = i64::from(start.num_seconds_from_midnight());
    let mut end_secs = i64::from(end.num_seconds_from_midnight());
    if end <= start {
        end_secs += 24 * 60 * 60;
    }
    (end_secs - start_secs) as f64 / 3600.0
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(de)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse une heure "HH:MM" (ou "HH:MM:SS").
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time (expected HH:MM): {raw}"))
}

/// Jour de la semaine numéroté 0 (dimanche) à 6 (samedi).
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Ensemble de jours de semaine (bit i = jour i, 0 = dimanche).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn all() -> Self {
        Self(0b0111_1111)
    }

    /// Lundi à vendredi.
    pub fn working_week() -> Self {
        Self(0b0011_1110)
    }

    /// Samedi et dimanche.
    pub fn weekend() -> Self {
        Self(0b0100_0001)
    }

    pub fn from_indices(days: &[u8]) -> Result<Self, String> {
        let mut set = Self::EMPTY;
        for &d in days {
            let day =
                weekday_from_index(d).ok_or_else(|| format!("weekday out of range 0-6: {d}"))?;
            set.insert(day);
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << weekday_index(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << weekday_index(day)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_disjoint(&self, other: &WeekdaySet) -> bool {
        self.0 & other.0 == 0
    }

    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.0 & (1 << i) != 0).collect()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = String;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(&days)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices()
    }
}

impl FromStr for WeekdaySet {
    type Err = String;

    /// "1,2,3,4,5" ; une chaîne vide donne l'ensemble vide.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .split(',')
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| {
                chunk
                    .parse::<u8>()
                    .map_err(|_| format!("invalid weekday: {chunk}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_indices(&days)
    }
}

/// Paramètres d'une génération (dates incluses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub eligible_weekdays: WeekdaySet,
    #[serde(default = "default_multiplier")]
    pub holiday_credit_multiplier: f64,
    /// Agents de garde par groupe un jour ordinaire (repos = N - on_duty).
    #[serde(default = "default_on_duty")]
    pub on_duty_per_group: usize,
    /// Jours dont le crédit alimente le compteur week-end.
    #[serde(default)]
    pub weekend_weekdays: WeekdaySet,
    #[serde(default = "default_ceiling")]
    pub weekly_hour_ceiling: f64,
    #[serde(default = "default_floor")]
    pub weekly_hour_floor: f64,
    #[serde(default)]
    pub week_start: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_length: Option<u32>,
}

fn default_multiplier() -> f64 {
    1.5
}

fn default_on_duty() -> usize {
    1
}

fn default_ceiling() -> f64 {
    48.0
}

fn default_floor() -> f64 {
    24.0
}

impl ScheduleConfig {
    pub fn new(start: NaiveDate, end: NaiveDate, eligible_weekdays: WeekdaySet) -> Self {
        Self {
            start,
            end,
            eligible_weekdays,
            holiday_credit_multiplier: default_multiplier(),
            on_duty_per_group: default_on_duty(),
            weekend_weekdays: WeekdaySet::EMPTY,
            weekly_hour_ceiling: default_ceiling(),
            weekly_hour_floor: default_floor(),
            week_start: 0,
            cycle_length: None,
        }
    }

    /// Jour de début de semaine, `None` hors de 0-6.
    pub fn week_start_day(&self) -> Option<Weekday> {
        weekday_from_index(self.week_start)
    }
}

/// Roster complet
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub members: Vec<Worker>,
    #[serde(default)]
    pub shift_types: Vec<ShiftType>,
}

impl Roster {
    /// Inscrit un agent ; sans position, il prend la suivante.
    pub fn enroll(&mut self, mut worker: Worker) -> &Worker {
        if worker.position == 0 {
            worker.position = self.next_position();
        }
        self.members.push(worker);
        &self.members[self.members.len() - 1]
    }

    pub fn next_position(&self) -> u32 {
        self.members.iter().map(|w| w.position).max().unwrap_or(0) + 1
    }

    pub fn find_member<'a>(&'a self, id: &WorkerId) -> Option<&'a Worker> {
        self.members.iter().find(|w| &w.id == id)
    }

    /// Reporte les crédits finaux d'un roulement sur les agents persistés.
    pub fn apply_credits(&mut self, outcome: &RotationOutcome) {
        for worker in self.members.iter_mut() {
            if let Some(credit) = outcome.credits.get(&worker.id) {
                worker.credit = *credit;
            }
            if let Some(credit) = outcome.weekend_credits.get(&worker.id) {
                worker.weekend_credit = *credit;
            }
        }
    }
}
