use super::types::{specialty_label, RotationMode, SchedError};
use super::util;
use crate::calendar;
use crate::model::{Roster, ScheduleConfig};
use std::collections::HashSet;

/// Rejette une configuration invalide avant tout calcul.
pub(super) fn validate(
    roster: &Roster,
    config: &ScheduleConfig,
    mode: RotationMode,
) -> Result<(), SchedError> {
    if config.end < config.start {
        return Err(SchedError::InvalidDateRange {
            start: config.start,
            end: config.end,
        });
    }
    if config.eligible_weekdays.is_empty() {
        return Err(SchedError::NoEligibleWeekdays);
    }
    if calendar::eligible_dates(config.start, config.end, config.eligible_weekdays).is_empty() {
        return Err(SchedError::NoEligibleDays {
            start: config.start,
            end: config.end,
        });
    }

    let mut seen = HashSet::new();
    for worker in &roster.members {
        if !seen.insert(&worker.id) {
            return Err(SchedError::DuplicateWorker(worker.id.as_str().to_string()));
        }
        let credits_ok = [worker.credit, worker.weekend_credit]
            .iter()
            .all(|c| c.is_finite() && *c >= 0.0);
        if !credits_ok {
            return Err(SchedError::InvalidCredit(worker.id.as_str().to_string()));
        }
    }

    match mode {
        RotationMode::DaysOff => validate_days_off(roster, config),
        RotationMode::Shifts => validate_shifts(roster, config),
    }
}

fn validate_days_off(roster: &Roster, config: &ScheduleConfig) -> Result<(), SchedError> {
    let multiplier = config.holiday_credit_multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(SchedError::InvalidMultiplier(multiplier));
    }
    if config.on_duty_per_group == 0 {
        return Err(SchedError::InvalidOnDuty);
    }
    if !config.weekend_weekdays.is_empty()
        && config.weekend_weekdays.is_disjoint(&config.eligible_weekdays)
    {
        return Err(SchedError::WeekendNotEligible);
    }

    let required = config.on_duty_per_group + 1;
    for group in util::specialty_groups(&roster.members) {
        if group.members.len() < required {
            return Err(SchedError::GroupTooSmall {
                specialty: specialty_label(group.specialty).to_string(),
                size: group.members.len(),
                required,
            });
        }
    }
    Ok(())
}

fn validate_shifts(roster: &Roster, config: &ScheduleConfig) -> Result<(), SchedError> {
    if roster.shift_types.is_empty() {
        return Err(SchedError::NoShiftTypes);
    }
    if util::specialty_groups(&roster.members).is_empty() {
        return Err(SchedError::NoActiveWorkers);
    }

    if config.week_start_day().is_none() {
        return Err(SchedError::InvalidWeekStart(config.week_start));
    }

    let cycle_len = cycle_length(roster, config)?;
    let mut indices = HashSet::new();
    for shift in &roster.shift_types {
        let invalid = |reason| SchedError::InvalidShiftType {
            name: shift.name.clone(),
            reason,
        };
        if !shift.duration_hours.is_finite() || shift.duration_hours <= 0.0 {
            return Err(invalid("duration must be positive"));
        }
        if !indices.insert(shift.cycle_index) {
            return Err(invalid("duplicate cycle index"));
        }
        if shift.cycle_index >= cycle_len {
            return Err(invalid("cycle index beyond cycle length"));
        }
    }

    if !(config.weekly_hour_ceiling.is_finite() && config.weekly_hour_ceiling > 0.0) {
        return Err(SchedError::InvalidCeiling("default".to_string()));
    }
    for worker in roster.members.iter().filter(|w| w.is_rotating()) {
        if let Some(ceiling) = worker.weekly_hour_ceiling {
            if !(ceiling.is_finite() && ceiling > 0.0) {
                return Err(SchedError::InvalidCeiling(worker.id.as_str().to_string()));
            }
        }
    }
    Ok(())
}

/// Longueur de l'ordre cyclique : explicite, sinon plus grand index + 1.
pub(super) fn cycle_length(roster: &Roster, config: &ScheduleConfig) -> Result<u32, SchedError> {
    if let Some(len) = config.cycle_length {
        return Ok(len);
    }
    let mut len = 1;
    for shift in &roster.shift_types {
        let next = shift
            .cycle_index
            .checked_add(1)
            .ok_or_else(|| SchedError::InvalidShiftType {
                name: shift.name.clone(),
                reason: "cycle index too large",
            })?;
        len = len.max(next);
    }
    Ok(len)
}

/// Position qui précède `index` dans un cycle de `len` postes.
pub(super) fn preceding_index(index: u32, len: u32) -> u32 {
    if index == 0 {
        len.saturating_sub(1)
    } else {
        index - 1
    }
}
