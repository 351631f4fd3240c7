#![forbid(unsafe_code)]
//! Roulement — moteur de roulement équitable (sans BD).
//!
//! - Roulement repos/garde par spécialité, crédit d'équité par agent.
//! - Rotation de postes (round-robin, plafond horaire hebdomadaire).
//! - Jours fériés injectés via [`HolidayClassifier`].
//! - Stockage fichiers (JSON/CSV) en dehors du moteur.

// Les événements ne sont émis qu'avec la feature `logging`.
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::warn!($($arg)*);
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::info!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::debug!($($arg)*);
    }};
}

pub mod calendar;
pub mod holiday;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use calendar::{CalendarDay, CalendarWalk, ClassifierWarning, DayKind};
pub use holiday::{ClassifierError, HolidayClassifier, HolidayKind, HolidayTable, NoHolidays};
pub use model::{
    DutyMode, Roster, ScheduleConfig, ShiftType, WeekdaySet, Worker, WorkerId, WorkerRole,
};
pub use scheduler::{
    DayRecord, GroupDay, Notice, RotationMode, RotationOutcome, SchedError, Scheduler,
    ShiftAssignment, ShiftOutcome,
};
pub use storage::{JsonStorage, Storage};
