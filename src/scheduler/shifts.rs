use super::state::RotationState;
use super::types::{
    ForcedAssignmentNotice, Notice, RotationMode, SchedError, ShiftAssignment, ShiftOutcome,
    UnderFloorNotice,
};
use super::util::{self, Group};
use super::{validate, Scheduler};
use crate::calendar;
use crate::model::{DutyMode, ScheduleConfig, ShiftType, Worker};
use chrono::NaiveDate;

pub(super) fn assign_shifts(
    scheduler: &Scheduler,
    config: &ScheduleConfig,
) -> Result<ShiftOutcome, SchedError> {
    validate::validate(&scheduler.roster, config, RotationMode::Shifts)?;

    let workers = &scheduler.roster.members;
    let groups = util::specialty_groups(workers);
    let rotating: Vec<usize> = groups
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .collect();

    let mut shift_types: Vec<&ShiftType> = scheduler.roster.shift_types.iter().collect();
    shift_types.sort_by_key(|s| s.cycle_index);
    let cycle_len = validate::cycle_length(&scheduler.roster, config)?;

    let walk = calendar::walk(config, scheduler.classifier());
    let week_start = config
        .week_start_day()
        .ok_or(SchedError::InvalidWeekStart(config.week_start))?;
    let mut state = RotationState::new(workers);
    let mut current_week: Option<NaiveDate> = None;
    let mut assignments = Vec::new();
    let mut notices = Vec::new();

    for day in &walk.days {
        let week = util::week_of(day.date, week_start);
        if current_week != Some(week) {
            if let Some(previous) = current_week {
                floor_notices(workers, &rotating, &state, config, previous, &mut notices);
            }
            state.reset_week();
            current_week = Some(week);
        }

        for shift in &shift_types {
            let preceding = validate::preceding_index(shift.cycle_index, cycle_len);

            for group in &groups {
                let eligible = group.members.iter().copied().filter(|&idx| {
                    let worker = &workers[idx];
                    let chained = worker.duty == DutyMode::Standard
                        && state.last_shift(idx) == Some((day.date, preceding));
                    let over = state.weekly_hours(idx) + shift.duration_hours
                        > ceiling(worker, config);
                    !chained && !over
                });

                // premier minimum = ordre du roster en cas d'égalité
                let (chosen, forced) = match eligible.min_by_key(|&idx| state.rotations(idx)) {
                    Some(idx) => (idx, false),
                    None => match least_loaded(group, &state) {
                        Some(idx) => (idx, true),
                        None => continue,
                    },
                };

                state.record_shift(chosen, day.date, shift.cycle_index, shift.duration_hours);
                let worker = &workers[chosen];

                if forced {
                    log_warn!(
                        date = %day.date,
                        shift = %shift.name,
                        specialty = super::types::specialty_label(group.specialty),
                        worker = %worker.id,
                        "no eligible candidate, forced assignment"
                    );
                    notices.push(Notice::ForcedAssignment(ForcedAssignmentNotice {
                        date: day.date,
                        shift: shift.name.clone(),
                        specialty: group.specialty.map(str::to_owned),
                        worker: worker.id.clone(),
                        weekly_hours: state.weekly_hours(chosen),
                    }));
                }

                assignments.push(ShiftAssignment {
                    date: day.date,
                    shift: shift.name.clone(),
                    specialty: group.specialty.map(str::to_owned),
                    worker: worker.id.clone(),
                    forced,
                });
            }
        }
    }

    if let Some(last) = current_week {
        floor_notices(workers, &rotating, &state, config, last, &mut notices);
    }

    log_info!(
        assignments = assignments.len(),
        notices = notices.len(),
        "shift rotation done"
    );

    Ok(ShiftOutcome {
        assignments,
        notices,
        warnings: walk.warnings,
        hours: state.snapshot_hours(workers, &rotating),
    })
}

fn ceiling(worker: &Worker, config: &ScheduleConfig) -> f64 {
    worker
        .weekly_hour_ceiling
        .unwrap_or(config.weekly_hour_ceiling)
}

fn floor(worker: &Worker, config: &ScheduleConfig) -> f64 {
    worker.weekly_hour_floor.unwrap_or(config.weekly_hour_floor)
}

/// Membre le moins chargé de la semaine, départagé par l'ordre du roster.
fn least_loaded(group: &Group<'_>, state: &RotationState) -> Option<usize> {
    group
        .members
        .iter()
        .copied()
        .min_by(|&a, &b| state.weekly_hours(a).total_cmp(&state.weekly_hours(b)))
}

fn floor_notices(
    workers: &[Worker],
    rotating: &[usize],
    state: &RotationState,
    config: &ScheduleConfig,
    week_start: NaiveDate,
    out: &mut Vec<Notice>,
) {
    for &idx in rotating {
        let worker = &workers[idx];
        let hours = state.weekly_hours(idx);
        let floor = floor(worker, config);
        if hours < floor {
            out.push(Notice::UnderFloor(UnderFloorNotice {
                worker: worker.id.clone(),
                week_start,
                hours,
                floor,
            }));
        }
    }
}
