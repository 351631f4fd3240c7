use super::types::CreditTrack;
use crate::model::{Worker, WorkerId};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// État transitoire d'une génération, indexé par la place de l'agent dans le roster.
///
/// Créé à chaque appel, jamais partagé ; le roster d'entrée n'est pas modifié.
#[derive(Debug, Clone)]
pub(super) struct RotationState {
    credits: Vec<f64>,
    weekend_credits: Vec<f64>,
    weekly_hours: Vec<f64>,
    last_shift: Vec<Option<(NaiveDate, u32)>>,
    rotations: Vec<u64>,
}

impl RotationState {
    pub(super) fn new(workers: &[Worker]) -> Self {
        Self {
            credits: workers.iter().map(|w| w.credit).collect(),
            weekend_credits: workers.iter().map(|w| w.weekend_credit).collect(),
            weekly_hours: vec![0.0; workers.len()],
            last_shift: vec![None; workers.len()],
            rotations: vec![0; workers.len()],
        }
    }

    pub(super) fn credit(&self, idx: usize, track: CreditTrack) -> f64 {
        match track {
            CreditTrack::Regular => self.credits[idx],
            CreditTrack::Weekend => self.weekend_credits[idx],
        }
    }

    pub(super) fn add_credit(&mut self, idx: usize, track: CreditTrack, amount: f64) {
        match track {
            CreditTrack::Regular => self.credits[idx] += amount,
            CreditTrack::Weekend => self.weekend_credits[idx] += amount,
        }
    }

    pub(super) fn weekly_hours(&self, idx: usize) -> f64 {
        self.weekly_hours[idx]
    }

    pub(super) fn rotations(&self, idx: usize) -> u64 {
        self.rotations[idx]
    }

    pub(super) fn reset_week(&mut self) {
        self.weekly_hours.iter_mut().for_each(|h| *h = 0.0);
    }

    /// Dernier poste tenu (date, place dans le cycle).
    pub(super) fn last_shift(&self, idx: usize) -> Option<(NaiveDate, u32)> {
        self.last_shift[idx]
    }

    pub(super) fn record_shift(
        &mut self,
        idx: usize,
        date: NaiveDate,
        cycle_index: u32,
        hours: f64,
    ) {
        self.weekly_hours[idx] += hours;
        self.last_shift[idx] = Some((date, cycle_index));
        self.rotations[idx] += 1;
    }

    /// Crédits finaux des agents `selected` (indices dans `workers`).
    pub(super) fn snapshot_credits(
        &self,
        workers: &[Worker],
        selected: &[usize],
        track: CreditTrack,
    ) -> BTreeMap<WorkerId, f64> {
        selected
            .iter()
            .map(|&idx| (workers[idx].id.clone(), self.credit(idx, track)))
            .collect()
    }

    pub(super) fn snapshot_hours(
        &self,
        workers: &[Worker],
        selected: &[usize],
    ) -> BTreeMap<WorkerId, f64> {
        selected
            .iter()
            .map(|&idx| (workers[idx].id.clone(), self.weekly_hours[idx]))
            .collect()
    }
}
