#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use roulement::{
    io,
    model::{ScheduleConfig, WeekdaySet},
    scheduler::{Notice, RotationMode, Scheduler},
    storage::{JsonStorage, Storage},
    HolidayTable,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de roulement équitable (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

/// Période et jours éligibles
#[derive(Args, Debug)]
struct Period {
    /// Premier jour (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,
    /// Dernier jour inclus (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,
    /// Jours éligibles "1,2,3,4,5" (0 = dimanche)
    #[arg(long, default_value = "0,1,2,3,4,5,6")]
    weekdays: WeekdaySet,
    /// CSV de jours fériés `date,name[,kind]`
    #[arg(long)]
    holidays: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    DaysOff,
    Shifts,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des agents depuis un CSV
    ImportMembers {
        #[arg(long)]
        csv: String,
    },

    /// Importer des types de poste depuis un CSV
    ImportShiftTypes {
        #[arg(long)]
        csv: String,
    },

    /// Lister et optionnellement exporter les agents
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Valider une configuration sans générer
    Check {
        #[command(flatten)]
        period: Period,
        #[arg(long, value_enum, default_value_t = ModeArg::DaysOff)]
        mode: ModeArg,
        #[arg(long, default_value_t = 1)]
        on_duty: usize,
    },

    /// Roulement repos/garde
    Rotate {
        #[command(flatten)]
        period: Period,
        #[arg(long, default_value_t = 1.5)]
        multiplier: f64,
        #[arg(long, default_value_t = 1)]
        on_duty: usize,
        /// Jours comptés sur le compteur week-end, ex. "0,6"
        #[arg(long)]
        weekend_weekdays: Option<WeekdaySet>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        credits_csv: Option<String>,
        /// Reporte les crédits finaux dans le roster
        #[arg(long)]
        write_back: bool,
    },

    /// Rotation des postes
    Shifts {
        #[command(flatten)]
        period: Period,
        #[arg(long, default_value_t = 48.0)]
        ceiling: f64,
        #[arg(long, default_value_t = 24.0)]
        floor: f64,
        /// Premier jour de la semaine (0 = dimanche)
        #[arg(long, default_value_t = 0)]
        week_start: u8,
        #[arg(long)]
        cycle_length: Option<u32>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;
    let mut roster = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::ImportMembers { csv } => {
            let workers = io::import_members_csv(csv)?;
            let count = workers.len();
            for worker in workers {
                roster.enroll(worker);
            }
            storage.save(&roster)?;
            println!("{count} member(s) imported");
            0
        }
        Commands::ImportShiftTypes { csv } => {
            let shifts = io::import_shift_types_csv(csv)?;
            roster.shift_types = shifts;
            storage.save(&roster)?;
            println!("{} shift type(s) imported", roster.shift_types.len());
            0
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_json(path, &roster)?;
            }
            if let Some(path) = out_csv {
                io::export_members_csv(path, &roster)?;
            }
            for m in &roster.members {
                println!(
                    "{} | {} | {} | credit {} | weekend {}",
                    m.id,
                    m.name,
                    m.specialty.as_deref().unwrap_or("-"),
                    m.credit,
                    m.weekend_credit
                );
            }
            0
        }
        Commands::Check {
            period,
            mode,
            on_duty,
        } => {
            let mut config = base_config(&period);
            config.on_duty_per_group = on_duty;
            let mode = match mode {
                ModeArg::DaysOff => RotationMode::DaysOff,
                ModeArg::Shifts => RotationMode::Shifts,
            };
            Scheduler::with_roster(roster).validate(&config, mode)?;
            println!("OK: configuration valid");
            0
        }
        Commands::Rotate {
            period,
            multiplier,
            on_duty,
            weekend_weekdays,
            out_json,
            out_csv,
            credits_csv,
            write_back,
        } => {
            let mut config = base_config(&period);
            config.holiday_credit_multiplier = multiplier;
            config.on_duty_per_group = on_duty;
            config.weekend_weekdays = weekend_weekdays.unwrap_or_default();

            let scheduler = scheduler_for(roster, &period)?;
            let outcome = scheduler.rotate_days_off(&config)?;

            if let Some(path) = out_json {
                io::export_json(path, &outcome)?;
            }
            if let Some(path) = out_csv {
                io::export_days_csv(path, &outcome)?;
            }
            if let Some(path) = credits_csv {
                io::export_credits_csv(path, &outcome, scheduler.roster())?;
            }

            for day in &outcome.days {
                for group in &day.groups {
                    println!(
                        "{} | {} | {} | working: {}",
                        day.date,
                        day.kind.as_str(),
                        group.specialty.as_deref().unwrap_or("-"),
                        group
                            .working
                            .iter()
                            .map(|id| id.as_str())
                            .collect::<Vec<_>>()
                            .join(",")
                    );
                }
            }

            if write_back {
                let mut roster = scheduler.roster().clone();
                roster.apply_credits(&outcome);
                storage.save(&roster)?;
            }

            if outcome.warnings.is_empty() {
                0
            } else {
                for w in &outcome.warnings {
                    eprintln!("warning: {}: {}", w.date, w.reason);
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Shifts {
            period,
            ceiling,
            floor,
            week_start,
            cycle_length,
            out_json,
            out_csv,
        } => {
            let mut config = base_config(&period);
            config.weekly_hour_ceiling = ceiling;
            config.weekly_hour_floor = floor;
            config.week_start = week_start;
            config.cycle_length = cycle_length;

            let scheduler = scheduler_for(roster, &period)?;
            let outcome = scheduler.assign_shifts(&config)?;

            if let Some(path) = out_json {
                io::export_json(path, &outcome)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &outcome)?;
            }

            for a in &outcome.assignments {
                println!(
                    "{} | {} | {} | {}{}",
                    a.date,
                    a.shift,
                    a.specialty.as_deref().unwrap_or("-"),
                    a.worker,
                    if a.forced { " (forced)" } else { "" }
                );
            }

            let forced = outcome
                .notices
                .iter()
                .filter(|n| matches!(n, Notice::ForcedAssignment(_)))
                .count();
            if forced == 0 && outcome.warnings.is_empty() {
                0
            } else {
                eprintln!(
                    "{forced} forced assignment(s), {} classifier warning(s)",
                    outcome.warnings.len()
                );
                2
            }
        }
    };

    std::process::exit(code);
}

fn base_config(period: &Period) -> ScheduleConfig {
    ScheduleConfig::new(period.start, period.end, period.weekdays)
}

fn scheduler_for(roster: roulement::Roster, period: &Period) -> Result<Scheduler> {
    let scheduler = Scheduler::with_roster(roster);
    Ok(match &period.holidays {
        Some(path) => {
            let table: HolidayTable = io::import_holidays_csv(path)?;
            scheduler.with_classifier(table)
        }
        None => scheduler,
    })
}
