use super::cost::{build_cost_matrix, is_forced, Candidate};
use super::{AssignOptions, Pool, SchedError, ShortfallPolicy};
use crate::matching::{validate_assignment, MatchingSolver};
use crate::model::{JobId, PreferenceRecord, Schedule, WorkerId};
use tracing::{debug, warn};

/// Boucle période par période : un couplage optimal par période, quotas
/// décrémentés, grille complétée par ajout en fin (ordre chronologique).
pub(crate) struct Aggregator<'a> {
    records: &'a [PreferenceRecord],
    jobs: &'a [JobId],
    periods: usize,
    period: usize,
    pool: Pool,
    schedule: Schedule,
    stranded: Vec<bool>,
    opts: AssignOptions,
}

impl<'a> Aggregator<'a> {
    /// `records` et `pool` sont dans le même ordre de préséance.
    pub(crate) fn new(
        records: &'a [PreferenceRecord],
        jobs: &'a [JobId],
        pool: Pool,
        periods: usize,
        opts: AssignOptions,
    ) -> Self {
        debug_assert_eq!(records.len(), pool.len());
        Self {
            records,
            jobs,
            periods,
            period: 0,
            stranded: vec![false; pool.len()],
            pool,
            schedule: Schedule::new(jobs.to_vec()),
            opts,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.period >= self.periods
    }

    /// Traite une période. Toute erreur interrompt le calcul.
    pub(crate) fn step<S: MatchingSolver + ?Sized>(&mut self, solver: &S) -> Result<(), SchedError> {
        let records = self.records;
        let period = self.period + 1;
        let periods_remaining = self.periods - self.period;
        let eligible = self.pool.eligible();

        if eligible.len() < self.jobs.len() {
            match self.opts.shortfall {
                ShortfallPolicy::Fail => {
                    return Err(SchedError::UnderSubscription {
                        period,
                        eligible: eligible.len(),
                        jobs: self.jobs.len(),
                    });
                }
                ShortfallPolicy::Partial => warn!(
                    period,
                    eligible = eligible.len(),
                    jobs = self.jobs.len(),
                    "not enough eligible workers, some jobs stay empty"
                ),
            }
        }

        for &rank in &eligible {
            let left = self.pool.remaining(rank);
            if left > periods_remaining && !self.stranded[rank] {
                self.stranded[rank] = true;
                warn!(
                    worker = %self.pool.worker(rank),
                    slots = left,
                    periods_remaining,
                    "entitlement can no longer be met"
                );
            }
        }

        let candidates: Vec<Candidate<'a>> = eligible
            .iter()
            .map(|&rank| Candidate {
                rank,
                record: &records[rank],
            })
            .collect();
        let forced = candidates
            .iter()
            .filter(|c| is_forced(self.pool.remaining(c.rank), periods_remaining))
            .count();
        debug!(period, eligible = candidates.len(), forced, "matching period");

        let mut column: Vec<Option<WorkerId>> = vec![None; self.jobs.len()];
        if !candidates.is_empty() {
            let matrix = build_cost_matrix(
                &candidates,
                self.jobs,
                &self.pool,
                periods_remaining,
                &self.opts.weights,
            );
            let pairs = solver.solve(&matrix)?;
            validate_assignment(&matrix, &pairs)?;
            for (row, col) in pairs {
                let rank = candidates[row].rank;
                self.pool.take(rank);
                column[col] = Some(self.pool.worker(rank).clone());
            }
        }

        self.schedule.push_period(column);
        self.period += 1;
        Ok(())
    }

    pub(crate) fn finish(self) -> Schedule {
        self.schedule
    }
}
