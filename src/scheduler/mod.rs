mod assignment;
mod consistency;
mod cost;
mod pool;
mod precedence;
mod types;

pub use pool::{Pool, PoolEntry};
pub use types::{AssignOptions, FairnessMismatch, SchedError, ShortfallPolicy, Weights};

use crate::matching::{HungarianSolver, MatchingSolver};
use crate::model::{Roster, Schedule};
use tracing::info;

/// Résultat d'un calcul complet.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub schedule: Schedule,
    /// Quotas attribués au départ (ordre de préséance).
    pub entitlement: Pool,
    pub mismatches: Vec<FairnessMismatch>,
}

/// Scheduler : encapsule les entrées d'un calcul et le solveur de couplage
#[derive(Debug)]
pub struct Scheduler<S = HungarianSolver> {
    roster: Roster,
    opts: AssignOptions,
    solver: S,
}

impl Scheduler<HungarianSolver> {
    pub fn new(roster: Roster) -> Self {
        Self::with_solver(roster, HungarianSolver)
    }
}

impl<S: MatchingSolver> Scheduler<S> {
    pub fn with_solver(roster: Roster, solver: S) -> Self {
        Self {
            roster,
            opts: AssignOptions::default(),
            solver,
        }
    }

    pub fn with_options(mut self, opts: AssignOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn options(&self) -> &AssignOptions {
        &self.opts
    }

    /// Quotas de chaque travailleur sur `periods` périodes, sans calculer
    /// de grille.
    pub fn entitlement(&self, periods: usize) -> Result<Pool, SchedError> {
        precedence::ensure_unique_jobs(&self.roster.jobs)?;
        let records = precedence::order_by_precedence(&self.roster.workers, &self.roster.preferences)?;
        let workers: Vec<_> = records.iter().map(|r| r.worker.clone()).collect();
        Pool::allocate(periods, self.roster.jobs.len(), &workers)
    }

    /// Calcule la grille complète sur `periods` périodes.
    pub fn assign(&self, periods: usize) -> Result<Outcome, SchedError> {
        self.opts.weights.validate()?;
        precedence::ensure_unique_jobs(&self.roster.jobs)?;
        let records = precedence::order_by_precedence(&self.roster.workers, &self.roster.preferences)?;
        for (worker, job) in precedence::unknown_choices(&records, &self.roster.jobs) {
            tracing::warn!(worker = %worker, job = %job, "preference names an unknown job");
        }

        let workers: Vec<_> = records.iter().map(|r| r.worker.clone()).collect();
        let entitlement = Pool::allocate(periods, self.roster.jobs.len(), &workers)?;
        info!(
            workers = workers.len(),
            jobs = self.roster.jobs.len(),
            periods,
            "starting assignment"
        );

        let mut run = assignment::Aggregator::new(
            &records,
            &self.roster.jobs,
            entitlement.clone(),
            periods,
            self.opts,
        );
        while !run.is_done() {
            run.step(&self.solver)?;
        }
        let schedule = run.finish();

        let mismatches = consistency::check_consistency(&schedule, &entitlement);
        info!(
            filled = schedule.filled_slots(),
            mismatches = mismatches.len(),
            "assignment finished"
        );
        Ok(Outcome {
            schedule,
            entitlement,
            mismatches,
        })
    }

    /// Re-vérifie une grille existante contre les quotas recalculés.
    pub fn check(&self, schedule: &Schedule) -> Result<Vec<FairnessMismatch>, SchedError> {
        let entitlement = self.entitlement(schedule.periods())?;
        Ok(consistency::check_consistency(schedule, &entitlement))
    }
}
