mod days_off;
mod shifts;
mod state;
mod types;
mod util;
mod validate;

pub use days_off::{day_increment, rest_count};
pub use types::{
    CreditTrack, DayRecord, ForcedAssignmentNotice, GroupDay, Notice, RotationMode,
    RotationOutcome, SchedError, ShiftAssignment, ShiftOutcome, UnderFloorNotice,
};

use crate::holiday::HolidayClassifier;
use crate::model::{Roster, ScheduleConfig, Worker};
use std::fmt;

/// Scheduler : encapsule le roster d'entrée et le classifieur de jours fériés.
///
/// Les générations travaillent sur un état privé ; le roster n'est jamais
/// modifié, relancer les mêmes entrées donne le même résultat.
#[derive(Default)]
pub struct Scheduler {
    roster: Roster,
    classifier: Option<Box<dyn HolidayClassifier>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("roster", &self.roster)
            .field("classifier", &self.classifier.is_some())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Roster) -> Self {
        Self {
            roster,
            classifier: None,
        }
    }

    pub fn with_classifier<C: HolidayClassifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Inscrit les agents dans l'ordre fourni.
    pub fn add_workers(&mut self, workers: Vec<Worker>) {
        for worker in workers {
            self.roster.enroll(worker);
        }
    }

    pub(crate) fn classifier(&self) -> Option<&dyn HolidayClassifier> {
        self.classifier.as_deref()
    }

    pub fn validate(&self, config: &ScheduleConfig, mode: RotationMode) -> Result<(), SchedError> {
        validate::validate(&self.roster, config, mode)
    }

    /// Roulement repos/garde sur la période de `config`.
    pub fn rotate_days_off(&self, config: &ScheduleConfig) -> Result<RotationOutcome, SchedError> {
        days_off::rotate_days_off(self, config)
    }

    /// Affectation des types de poste sur la période de `config`.
    pub fn assign_shifts(&self, config: &ScheduleConfig) -> Result<ShiftOutcome, SchedError> {
        shifts::assign_shifts(self, config)
    }
}
