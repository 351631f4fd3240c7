#![forbid(unsafe_code)]
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use roulement::scheduler::Notice;
use roulement::{
    DutyMode, Roster, ScheduleConfig, Scheduler, ShiftOutcome, ShiftType, WeekdaySet, Worker,
    WorkerId,
};
use std::collections::HashMap;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn worker(id: &str, position: u32) -> Worker {
    Worker::new(id).with_id(id).with_position(position)
}

fn shift(name: &str, start_hour: u32, hours: u32, cycle_index: u32) -> ShiftType {
    let start = NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap();
    let end = NaiveTime::from_hms_opt((start_hour + hours) % 24, 0, 0).unwrap();
    ShiftType::new(name, start, end, Some(f64::from(hours)), cycle_index).unwrap()
}

fn four_slots() -> Vec<ShiftType> {
    vec![
        shift("dawn", 0, 6, 0),
        shift("morning", 6, 6, 1),
        shift("afternoon", 12, 6, 2),
        shift("evening", 18, 6, 3),
    ]
}

fn sequence(outcome: &ShiftOutcome) -> Vec<String> {
    outcome
        .assignments
        .iter()
        .map(|a| format!("{}:{}", a.shift, a.worker))
        .collect()
}

fn week_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Vérifie enchaînement et plafond pour toute affectation non forcée.
fn assert_constraints(roster: &Roster, outcome: &ShiftOutcome, ceiling: f64) {
    let order: HashMap<&str, u32> = roster
        .shift_types
        .iter()
        .map(|s| (s.name.as_str(), s.cycle_index))
        .collect();
    let hours: HashMap<&str, f64> = roster
        .shift_types
        .iter()
        .map(|s| (s.name.as_str(), s.duration_hours))
        .collect();
    let cycle = roster.shift_types.iter().map(|s| s.cycle_index).max().unwrap() + 1;

    let mut weekly: HashMap<(WorkerId, NaiveDate), f64> = HashMap::new();
    let mut taken: HashMap<(WorkerId, NaiveDate), Vec<u32>> = HashMap::new();

    for a in &outcome.assignments {
        let idx = order[a.shift.as_str()];
        let preceding = (idx + cycle - 1) % cycle;
        let today = taken.entry((a.worker.clone(), a.date)).or_default();
        let total = weekly.entry((a.worker.clone(), week_of(a.date))).or_default();
        *total += hours[a.shift.as_str()];
        if !a.forced {
            assert!(
                !today.contains(&preceding),
                "{} chained {} on {}",
                a.worker,
                a.shift,
                a.date
            );
            assert!(*total <= ceiling, "{} over ceiling on {}", a.worker, a.date);
        }
        today.push(idx);
    }
}

#[test]
fn two_workers_two_separate_shifts() {
    let roster = Roster {
        members: vec![worker("a", 1), worker("b", 2)],
        shift_types: vec![shift("morning", 8, 6, 1), shift("afternoon", 14, 6, 3)],
    };
    let scheduler = Scheduler::with_roster(roster.clone());
    // lundi 6 au jeudi 9 : 8 créneaux
    let config = ScheduleConfig::new(day(6), day(9), WeekdaySet::all());
    let outcome = scheduler.assign_shifts(&config).unwrap();

    assert_eq!(outcome.assignments.len(), 8);
    assert_eq!(outcome.forced_count(), 0);
    assert_constraints(&roster, &outcome, 48.0);

    let a = outcome.hours[&WorkerId::new("a")];
    let b = outcome.hours[&WorkerId::new("b")];
    assert!((a - b).abs() <= 6.0);
    assert_eq!(a + b, 48.0);
}

#[test]
fn adjacent_shift_goes_to_someone_else() {
    let roster = Roster {
        members: vec![worker("a", 1), worker("b", 2)],
        shift_types: four_slots(),
    };
    let outcome = Scheduler::with_roster(roster)
        .assign_shifts(&ScheduleConfig::new(day(6), day(6), WeekdaySet::all()))
        .unwrap();

    insta::assert_snapshot!(
        sequence(&outcome).join(" "),
        @"dawn:a morning:b afternoon:a evening:b"
    );
    assert_eq!(outcome.forced_count(), 0);
}

#[test]
fn round_robin_follows_roster_order() {
    let roster = Roster {
        members: vec![worker("c", 3), worker("a", 1), worker("b", 2)],
        shift_types: vec![shift("day", 8, 8, 0)],
    };
    let outcome = Scheduler::with_roster(roster)
        .assign_shifts(&ScheduleConfig::new(day(6), day(11), WeekdaySet::all()))
        .unwrap();

    let workers: Vec<&str> = outcome.assignments.iter().map(|a| a.worker.as_str()).collect();
    assert_eq!(workers, vec!["c", "a", "b", "c", "a", "b"]);
}

#[test]
fn constraints_hold_over_a_busy_month() {
    let roster = Roster {
        members: vec![
            worker("a", 1),
            worker("b", 2),
            worker("c", 3),
            worker("n1", 4).with_specialty("nurse"),
            worker("n2", 5).with_specialty("nurse"),
        ],
        shift_types: four_slots(),
    };
    let outcome = Scheduler::with_roster(roster.clone())
        .assign_shifts(&ScheduleConfig::new(day(1), day(31), WeekdaySet::all()))
        .unwrap();

    // un créneau par (jour, poste, spécialité), forcé ou non
    assert_eq!(outcome.assignments.len(), 31 * 4 * 2);
    assert!(outcome.forced_count() > 0);
    assert_constraints(&roster, &outcome, 48.0);

    let notices = outcome
        .notices
        .iter()
        .filter(|n| matches!(n, Notice::ForcedAssignment(_)))
        .count();
    assert_eq!(notices, outcome.forced_count());
}

#[test]
fn exhausted_ceiling_forces_least_loaded() {
    let mut roster = Roster {
        members: vec![worker("solo", 1)],
        shift_types: vec![shift("long", 8, 12, 0)],
    };
    roster.members[0].weekly_hour_ceiling = Some(24.0);
    let outcome = Scheduler::with_roster(roster)
        .assign_shifts(&ScheduleConfig::new(day(6), day(8), WeekdaySet::all()))
        .unwrap();

    let forced: Vec<bool> = outcome.assignments.iter().map(|a| a.forced).collect();
    assert_eq!(forced, vec![false, false, true]);
    match &outcome.notices[0] {
        Notice::ForcedAssignment(n) => {
            assert_eq!(n.date, day(8));
            assert_eq!(n.weekly_hours, 36.0);
        }
        other => panic!("unexpected notice {other:?}"),
    }
}

#[test]
fn weekly_hours_reset_on_week_start() {
    let roster = Roster {
        members: vec![worker("solo", 1)],
        shift_types: vec![shift("long", 8, 12, 0)],
    };
    let scheduler = Scheduler::with_roster(roster);
    // vendredi 10 au lundi 13
    let mut config = ScheduleConfig::new(day(10), day(13), WeekdaySet::all());
    config.weekly_hour_ceiling = 24.0;

    let sunday_start = scheduler.assign_shifts(&config).unwrap();
    assert_eq!(sunday_start.forced_count(), 0);

    config.week_start = 1;
    let monday_start = scheduler.assign_shifts(&config).unwrap();
    let forced: Vec<bool> = monday_start.assignments.iter().map(|a| a.forced).collect();
    assert_eq!(forced, vec![false, false, true, false]);
}

#[test]
fn week_boundary_resets_even_when_week_start_is_not_eligible() {
    let roster = Roster {
        members: vec![worker("solo", 1)],
        shift_types: vec![shift("long", 8, 12, 0)],
    };
    let mut config = ScheduleConfig::new(day(6), day(17), WeekdaySet::working_week());
    config.weekly_hour_ceiling = 60.0;
    let outcome = Scheduler::with_roster(roster).assign_shifts(&config).unwrap();

    assert_eq!(outcome.assignments.len(), 10);
    assert_eq!(outcome.forced_count(), 0);
}

#[test]
fn continuous_duty_may_chain_adjacent_shifts() {
    let slots = vec![shift("dawn", 0, 6, 0), shift("morning", 6, 6, 1)];
    let config = ScheduleConfig::new(day(6), day(6), WeekdaySet::all());

    let standard = Roster {
        members: vec![worker("solo", 1)],
        shift_types: slots.clone(),
    };
    let outcome = Scheduler::with_roster(standard).assign_shifts(&config).unwrap();
    assert_eq!(outcome.forced_count(), 1);
    assert!(outcome.assignments[1].forced);

    let continuous = Roster {
        members: vec![worker("solo", 1).with_duty(DutyMode::Continuous24h)],
        shift_types: slots,
    };
    let outcome = Scheduler::with_roster(continuous).assign_shifts(&config).unwrap();
    assert_eq!(outcome.forced_count(), 0);
    assert_eq!(outcome.assignments.len(), 2);
}

#[test]
fn under_floor_weeks_are_reported() {
    let roster = Roster {
        members: vec![worker("solo", 1)],
        shift_types: vec![shift("short", 8, 6, 0)],
    };
    let outcome = Scheduler::with_roster(roster)
        .assign_shifts(&ScheduleConfig::new(day(6), day(6), WeekdaySet::all()))
        .unwrap();

    assert_eq!(outcome.notices.len(), 1);
    match &outcome.notices[0] {
        Notice::UnderFloor(n) => {
            assert_eq!(n.worker, WorkerId::new("solo"));
            assert_eq!(n.week_start, day(5));
            assert_eq!(n.hours, 6.0);
            assert_eq!(n.floor, 24.0);
        }
        other => panic!("unexpected notice {other:?}"),
    }
}

#[test]
fn shift_runs_are_deterministic() {
    let roster = Roster {
        members: vec![worker("a", 1), worker("b", 2), worker("c", 3)],
        shift_types: four_slots(),
    };
    let scheduler = Scheduler::with_roster(roster);
    let config = ScheduleConfig::new(day(1), day(14), WeekdaySet::all());
    assert_eq!(
        scheduler.assign_shifts(&config).unwrap(),
        scheduler.assign_shifts(&config).unwrap()
    );
}
