use crate::model::{Worker, WorkerRole};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Groupe de spécialité : indices des membres dans l'ordre du roster.
#[derive(Debug, Clone)]
pub(super) struct Group<'a> {
    pub(super) specialty: Option<&'a str>,
    pub(super) members: Vec<usize>,
}

/// Agents actifs hors congé, regroupés par spécialité (ordre stable des clés).
pub(super) fn specialty_groups(workers: &[Worker]) -> Vec<Group<'_>> {
    let mut by_tag: BTreeMap<Option<&str>, Vec<usize>> = BTreeMap::new();
    for (idx, worker) in workers.iter().enumerate() {
        if worker.is_rotating() {
            by_tag
                .entry(worker.specialty.as_deref())
                .or_default()
                .push(idx);
        }
    }
    by_tag
        .into_iter()
        .map(|(specialty, members)| Group { specialty, members })
        .collect()
}

pub(super) fn leave_only(workers: &[Worker]) -> Vec<usize> {
    workers
        .iter()
        .enumerate()
        .filter(|(_, w)| w.active && w.role == WorkerRole::LeaveOnly)
        .map(|(idx, _)| idx)
        .collect()
}

/// Premier jour de la semaine contenant `date`.
pub(super) fn week_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset =
        (7 + date.weekday().num_days_from_sunday() - week_start.num_days_from_sunday()) % 7;
    date.checked_sub_signed(Duration::days(i64::from(offset)))
        .unwrap_or(date)
}
