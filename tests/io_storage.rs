#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::{
    io, DutyMode, HolidayClassifier, JsonStorage, Roster, ScheduleConfig, Scheduler, Storage,
    WeekdaySet, WorkerId, WorkerRole,
};
use std::fs;
use tempfile::tempdir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[test]
fn members_csv_fills_optional_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.csv");
    fs::write(
        &path,
        "id,name,specialty,credit,position,leave_only,duty_24h,active\n\
         w1,Alice,,2.5,3,,,\n\
         ,Bob,nurse\n\
         w3,Chloé,nurse,0,,oui,non,true\n\
         w4,Dan,,,,no,yes,false\n",
    )
    .unwrap();

    let members = io::import_members_csv(&path).unwrap();
    assert_eq!(members.len(), 4);
    assert_eq!(members[0].id, WorkerId::new("w1"));
    assert_eq!(members[0].credit, 2.5);
    assert_eq!(members[0].position, 3);
    assert_eq!(members[0].specialty, None);
    assert!(!members[1].id.as_str().is_empty());
    assert_eq!(members[1].specialty.as_deref(), Some("nurse"));
    assert_eq!(members[2].role, WorkerRole::LeaveOnly);
    assert_eq!(members[3].duty, DutyMode::Continuous24h);
    assert!(!members[3].active);

    let mut roster = Roster::default();
    for m in members {
        roster.enroll(m);
    }
    let positions: Vec<u32> = roster.members.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![3, 4, 5, 6]);
}

#[test]
fn bad_member_row_reports_context() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.csv");
    fs::write(&path, "id,name,specialty,credit\nw1,Alice,,beaucoup\n").unwrap();
    let err = io::import_members_csv(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid credit for member Alice"));
}

#[test]
fn shift_types_csv_derives_duration_and_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shifts.csv");
    fs::write(
        &path,
        "name,start,end,duration_hours,cycle_index\n\
         morning,08:00,14:00\n\
         night,22:00,06:00,,3\n\
         split,10:00,20:00,7.5\n",
    )
    .unwrap();

    let shifts = io::import_shift_types_csv(&path).unwrap();
    assert_eq!(shifts[0].duration_hours, 6.0);
    assert_eq!(shifts[0].cycle_index, 0);
    assert_eq!(shifts[1].duration_hours, 8.0);
    assert_eq!(shifts[1].cycle_index, 3);
    assert_eq!(shifts[2].duration_hours, 7.5);
    assert_eq!(shifts[2].cycle_index, 2);
}

#[test]
fn holidays_csv_accepts_days_and_ranges() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.csv");
    fs::write(
        &path,
        "date,name,kind\n\
         2025-01-01,Jour de l'an,\n\
         2025-01-02..2025-01-04,Vacances,special\n",
    )
    .unwrap();

    let table = io::import_holidays_csv(&path).unwrap();
    assert_eq!(table.len(), 4);
    assert!(table.is_holiday(day(1)).unwrap());
    assert!(table.is_special_period(day(4)).unwrap());
    assert!(!table.is_special_period(day(5)).unwrap());
    assert_eq!(
        table.describe_holiday(day(3)).unwrap().as_deref(),
        Some("Vacances")
    );
}

#[test]
fn storage_roundtrip_keeps_written_back_credits() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("roster.json")).unwrap();
    assert!(storage.load_or_default().unwrap().members.is_empty());

    let mut scheduler = Scheduler::new();
    scheduler.add_workers(vec![
        roulement::Worker::new("A").with_id("a"),
        roulement::Worker::new("B").with_id("b"),
    ]);
    let outcome = scheduler
        .rotate_days_off(&ScheduleConfig::new(day(6), day(8), WeekdaySet::all()))
        .unwrap();
    let mut roster = scheduler.roster().clone();
    roster.apply_credits(&outcome);
    storage.save(&roster).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.members, roster.members);
    assert_eq!(loaded.members[0].position, 1);
    assert_eq!(loaded.members[1].position, 2);
    assert_eq!(loaded.members[0].credit + loaded.members[1].credit, 3.0);
}

#[test]
fn days_csv_lists_groups_and_leave() {
    let dir = tempdir().unwrap();
    let mut scheduler = Scheduler::new();
    scheduler.add_workers(vec![
        roulement::Worker::new("A").with_id("a"),
        roulement::Worker::new("B").with_id("b"),
        roulement::Worker::new("C")
            .with_id("c")
            .with_role(WorkerRole::LeaveOnly),
    ]);
    let outcome = scheduler
        .rotate_days_off(&ScheduleConfig::new(day(6), day(7), WeekdaySet::all()))
        .unwrap();

    let path = dir.path().join("days.csv");
    io::export_days_csv(&path, &outcome).unwrap();
    let csv = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(
        csv.replace("\r\n", "\n").trim_end().replace('\n', " | "),
        @"date,kind,holiday,specialty,working,resting | 2025-01-06,ordinary,,,b,a | 2025-01-06,ordinary,,(leave),,c | 2025-01-07,ordinary,,,a,b | 2025-01-07,ordinary,,(leave),,c"
    );
}

#[test]
fn members_csv_export_reads_back_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.csv");

    let mut capped = roulement::Worker::new("A")
        .with_id("a")
        .with_credit(2.5)
        .with_position(1)
        .with_specialty("nurse");
    capped.weekend_credit = 3.0;
    capped.weekly_hour_ceiling = Some(30.0);
    capped.weekly_hour_floor = Some(12.5);
    let mut off = roulement::Worker::new("B")
        .with_id("b")
        .with_position(2)
        .with_role(WorkerRole::LeaveOnly)
        .with_duty(DutyMode::Continuous24h);
    off.active = false;
    let roster = Roster {
        members: vec![capped, off],
        shift_types: Vec::new(),
    };

    io::export_members_csv(&path, &roster).unwrap();
    let members = io::import_members_csv(&path).unwrap();
    assert_eq!(members, roster.members);
    assert_eq!(members[0].weekend_credit, 3.0);
    assert_eq!(members[1].weekly_hour_ceiling, None);
}
