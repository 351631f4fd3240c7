use super::state::RotationState;
use super::types::{CreditTrack, DayRecord, GroupDay, RotationMode, RotationOutcome, SchedError};
use super::{util, validate, Scheduler};
use crate::calendar::{self, DayKind};
use crate::model::{ScheduleConfig, Worker, WorkerId};
use chrono::Datelike;

pub(super) fn rotate_days_off(
    scheduler: &Scheduler,
    config: &ScheduleConfig,
) -> Result<RotationOutcome, SchedError> {
    validate::validate(&scheduler.roster, config, RotationMode::DaysOff)?;

    let workers = &scheduler.roster.members;
    let groups = util::specialty_groups(workers);
    let on_leave = util::leave_only(workers);
    let walk = calendar::walk(config, scheduler.classifier());
    let mut state = RotationState::new(workers);
    let mut days = Vec::with_capacity(walk.days.len());

    for day in walk.days {
        let track = if config.weekend_weekdays.contains(day.date.weekday()) {
            CreditTrack::Weekend
        } else {
            CreditTrack::Regular
        };
        let increment = day_increment(day.kind, config.holiday_credit_multiplier);

        let mut group_days = Vec::with_capacity(groups.len());
        for group in &groups {
            let rest = rest_count(group.members.len(), config.on_duty_per_group);

            let mut order = group.members.clone();
            order.sort_by(|&a, &b| {
                state
                    .credit(a, track)
                    .total_cmp(&state.credit(b, track))
                    .then(workers[a].position.cmp(&workers[b].position))
            });

            let (resting, working) = order.split_at(rest);
            for &idx in resting {
                state.add_credit(idx, track, increment);
            }
            group_days.push(GroupDay {
                specialty: group.specialty.map(str::to_owned),
                working: ids(workers, working),
                resting: ids(workers, resting),
            });
        }

        for &idx in &on_leave {
            state.add_credit(idx, track, increment);
        }

        log_debug!(
            date = %day.date,
            kind = day.kind.as_str(),
            groups = group_days.len(),
            "day rotated"
        );

        days.push(DayRecord {
            date: day.date,
            kind: day.kind,
            holiday: day.holiday,
            track,
            groups: group_days,
            on_leave: ids(workers, &on_leave),
        });
    }

    let credited: Vec<usize> = groups
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .chain(on_leave.iter().copied())
        .collect();

    Ok(RotationOutcome {
        days,
        credits: state.snapshot_credits(workers, &credited, CreditTrack::Regular),
        weekend_credits: state.snapshot_credits(workers, &credited, CreditTrack::Weekend),
        warnings: walk.warnings,
    })
}

/// Nombre d'agents au repos dans un groupe de `group_size` membres.
///
/// Identique les jours fériés : seul l'incrément de crédit y change.
pub fn rest_count(group_size: usize, on_duty: usize) -> usize {
    group_size.saturating_sub(on_duty)
}

/// Crédit gagné par un jour de repos.
pub fn day_increment(kind: DayKind, holiday_multiplier: f64) -> f64 {
    match kind {
        DayKind::Ordinary => 1.0,
        DayKind::Holiday | DayKind::SpecialPeriod => holiday_multiplier,
    }
}

fn ids(workers: &[Worker], indices: &[usize]) -> Vec<WorkerId> {
    indices.iter().map(|&idx| workers[idx].id.clone()).collect()
}
