#![forbid(unsafe_code)]
//! Rotamatch — répartition de postes récurrents sur plusieurs périodes.
//!
//! - Quotas équitables en round-robin selon la préséance.
//! - Une matrice de coûts par période (préséance, vœux, urgence).
//! - Un couplage biparti de coût minimal par période (méthode hongroise).
//! - Vérification finale des quotas ; entrées/sorties fichiers (texte/CSV/JSON).

pub mod io;
pub mod labels;
pub mod matching;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use labels::PeriodLabels;
pub use matching::{CostMatrix, HungarianSolver, MatchingError, MatchingSolver};
pub use model::{JobId, PreferenceRecord, PreferenceTier, Roster, Schedule, WorkerId};
pub use report::{prepare_report, ReportRenderer, RunReport, TextSummary};
pub use scheduler::{
    AssignOptions, FairnessMismatch, Outcome, Pool, SchedError, Scheduler, ShortfallPolicy,
    Weights,
};
pub use storage::{JsonStorage, Storage};
