use crate::holiday::{HolidayKind, HolidayTable};
use crate::model::{parse_time, DutyMode, Roster, ShiftType, Worker, WorkerId, WorkerRole};
use crate::scheduler::{RotationOutcome, ShiftOutcome};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Import d'agents depuis CSV:
/// header `id,name[,specialty][,credit][,position][,leave_only][,duty_24h][,active]`
/// `[,weekend_credit][,weekly_hour_ceiling][,weekly_hour_floor]`
///
/// Un id vide est tiré au hasard, une position vide ou nulle sera attribuée
/// à l'inscription.
pub fn import_members_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid member row (empty name)");
        }
        let mut worker = Worker::new(name);
        if let Some(id) = field(&rec, 0) {
            worker.id = WorkerId::new(id);
        }
        worker.specialty = field(&rec, 2).map(str::to_string);
        if let Some(credit) = field(&rec, 3) {
            worker.credit = credit
                .parse()
                .with_context(|| format!("invalid credit for member {name}"))?;
        }
        if let Some(position) = field(&rec, 4) {
            worker.position = position
                .parse()
                .with_context(|| format!("invalid position for member {name}"))?;
        }
        if let Some(flag) = field(&rec, 5) {
            if parse_bool(flag).with_context(|| format!("invalid leave_only for member {name}"))? {
                worker.role = WorkerRole::LeaveOnly;
            }
        }
        if let Some(flag) = field(&rec, 6) {
            if parse_bool(flag).with_context(|| format!("invalid duty_24h for member {name}"))? {
                worker.duty = DutyMode::Continuous24h;
            }
        }
        if let Some(flag) = field(&rec, 7) {
            worker.active =
                parse_bool(flag).with_context(|| format!("invalid active for member {name}"))?;
        }
        if let Some(credit) = field(&rec, 8) {
            worker.weekend_credit = credit
                .parse()
                .with_context(|| format!("invalid weekend_credit for member {name}"))?;
        }
        worker.weekly_hour_ceiling = field(&rec, 9)
            .map(str::parse::<f64>)
            .transpose()
            .with_context(|| format!("invalid weekly_hour_ceiling for member {name}"))?;
        worker.weekly_hour_floor = field(&rec, 10)
            .map(str::parse::<f64>)
            .transpose()
            .with_context(|| format!("invalid weekly_hour_floor for member {name}"))?;
        out.push(worker);
    }
    Ok(out)
}

/// Import de types de poste: header `name,start,end[,duration_hours][,cycle_index]`
///
/// Sans index, le type prend sa place de ligne dans l'ordre cyclique.
pub fn import_shift_types_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftType>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim().to_string();
        let start = parse_time(rec.get(1).context("missing start")?).map_err(anyhow::Error::msg)?;
        let end = parse_time(rec.get(2).context("missing end")?).map_err(anyhow::Error::msg)?;
        let duration = field(&rec, 3)
            .map(|d| d.parse::<f64>())
            .transpose()
            .with_context(|| format!("invalid duration for shift {name}"))?;
        let cycle_index = match field(&rec, 4) {
            Some(idx) => idx
                .parse()
                .with_context(|| format!("invalid cycle index for shift {name}"))?,
            None => u32::try_from(row).context("too many shift types")?,
        };
        let shift =
            ShiftType::new(name, start, end, duration, cycle_index).map_err(anyhow::Error::msg)?;
        out.push(shift);
    }
    Ok(out)
}

/// Import de jours fériés: header `date,name[,kind]`
///
/// `date` est un jour `YYYY-MM-DD` ou une plage incluse `a..b` / `a/b` ;
/// `kind` vaut `holiday` (défaut) ou `special`.
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<HolidayTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut table = HolidayTable::new();
    for rec in rdr.records() {
        let rec = rec?;
        let raw = rec.get(0).context("missing date")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let kind = match field(&rec, 2) {
            None => HolidayKind::Holiday,
            Some(k) => parse_kind(k).with_context(|| format!("invalid kind for {raw}"))?,
        };
        let (start, end) = parse_range(raw)?;
        table.insert_range(start, end, name, kind);
    }
    Ok(table)
}

fn field(rec: &StringRecord, idx: usize) -> Option<&str> {
    rec.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_kind(s: &str) -> anyhow::Result<HolidayKind> {
    match s.to_ascii_lowercase().as_str() {
        "holiday" | "ferie" | "férié" => Ok(HolidayKind::Holiday),
        "special" | "special_period" => Ok(HolidayKind::SpecialPeriod),
        _ => bail!("expected holiday or special"),
    }
}

fn parse_range(raw: &str) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = raw.split_once("..").or_else(|| raw.split_once('/')) {
        let start = parse_date(start_raw.trim())?;
        let end = parse_date(end_raw.trim())?;
        if end < start {
            bail!("holiday range end before start: {raw}");
        }
        Ok((start, end))
    } else {
        let day = parse_date(raw)?;
        Ok((day, day))
    }
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON (jolie mise en forme) d'un résultat ou d'un roster
pub fn export_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du roulement: header `date,kind,holiday,specialty,working,resting`
///
/// Une ligne par groupe, plus une ligne `(leave)` pour les congés ; les ids
/// sont séparés par `;`.
pub fn export_days_csv<P: AsRef<Path>>(path: P, outcome: &RotationOutcome) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "kind", "holiday", "specialty", "working", "resting"])?;
    for day in &outcome.days {
        let date = day.date.to_string();
        let holiday = day.holiday.as_deref().unwrap_or("");
        for group in &day.groups {
            w.write_record([
                date.as_str(),
                day.kind.as_str(),
                holiday,
                group.specialty.as_deref().unwrap_or(""),
                join_ids(&group.working).as_str(),
                join_ids(&group.resting).as_str(),
            ])?;
        }
        if !day.on_leave.is_empty() {
            w.write_record([
                date.as_str(),
                day.kind.as_str(),
                holiday,
                "(leave)",
                "",
                join_ids(&day.on_leave).as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des crédits finaux: header `worker_id,name,credit,weekend_credit`
pub fn export_credits_csv<P: AsRef<Path>>(
    path: P,
    outcome: &RotationOutcome,
    roster: &Roster,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["worker_id", "name", "credit", "weekend_credit"])?;
    for (id, credit) in &outcome.credits {
        let name = roster
            .find_member(id)
            .map(|m| m.name.as_str())
            .unwrap_or("");
        let weekend = outcome.weekend_credits.get(id).copied().unwrap_or(0.0);
        w.write_record([
            id.as_str(),
            name,
            credit.to_string().as_str(),
            weekend.to_string().as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des postes: header `date,shift,specialty,worker_id,forced`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    outcome: &ShiftOutcome,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift", "specialty", "worker_id", "forced"])?;
    for a in &outcome.assignments {
        let date = a.date.to_string();
        w.write_record([
            date.as_str(),
            a.shift.as_str(),
            a.specialty.as_deref().unwrap_or(""),
            a.worker.as_str(),
            if a.forced { "true" } else { "false" },
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des agents, relisible par `import_members_csv`.
pub fn export_members_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "name",
        "specialty",
        "credit",
        "position",
        "leave_only",
        "duty_24h",
        "active",
        "weekend_credit",
        "weekly_hour_ceiling",
        "weekly_hour_floor",
    ])?;
    let mut position = itoa::Buffer::new();
    for m in &roster.members {
        let hours = |h: Option<f64>| h.map(|h| h.to_string()).unwrap_or_default();
        w.write_record([
            m.id.as_str(),
            m.name.as_str(),
            m.specialty.as_deref().unwrap_or(""),
            m.credit.to_string().as_str(),
            position.format(m.position),
            bool_str(m.role == WorkerRole::LeaveOnly),
            bool_str(m.duty == DutyMode::Continuous24h),
            bool_str(m.active),
            m.weekend_credit.to_string().as_str(),
            hours(m.weekly_hour_ceiling).as_str(),
            hours(m.weekly_hour_floor).as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

fn join_ids(ids: &[WorkerId]) -> String {
    ids.iter().map(WorkerId::as_str).collect::<Vec<_>>().join(";")
}
