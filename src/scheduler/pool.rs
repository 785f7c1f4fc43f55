use super::SchedError;
use crate::model::WorkerId;
use serde::{Deserialize, Serialize};

/// Quota restant de chaque travailleur, dans l'ordre de préséance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    entries: Vec<PoolEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub worker: WorkerId,
    pub slots: usize,
}

impl Pool {
    /// Répartition round-robin des `periods × jobs` créneaux : le créneau `i`
    /// revient à `workers[i % workers.len()]`, donc le reste éventuel profite
    /// aux premiers de la liste.
    pub fn allocate(periods: usize, jobs: usize, workers: &[WorkerId]) -> Result<Self, SchedError> {
        if workers.is_empty() {
            return Err(SchedError::EmptyInput("no workers"));
        }
        if jobs == 0 {
            return Err(SchedError::EmptyInput("no jobs"));
        }
        if periods == 0 {
            return Err(SchedError::EmptyInput("no periods"));
        }

        let total = periods * jobs;
        let base = total / workers.len();
        let extra = total % workers.len();
        let entries = workers
            .iter()
            .enumerate()
            .map(|(idx, worker)| PoolEntry {
                worker: worker.clone(),
                slots: base + usize::from(idx < extra),
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, worker: &WorkerId) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| &e.worker == worker)
            .map(|e| e.slots)
    }

    pub(crate) fn remaining(&self, rank: usize) -> usize {
        self.entries[rank].slots
    }

    pub(crate) fn worker(&self, rank: usize) -> &WorkerId {
        &self.entries[rank].worker
    }

    /// Consomme un créneau du travailleur de rang `rank`.
    pub(crate) fn take(&mut self, rank: usize) {
        let entry = &mut self.entries[rank];
        debug_assert!(entry.slots > 0, "pool exhausted for {}", entry.worker);
        entry.slots = entry.slots.saturating_sub(1);
    }

    /// Rangs des travailleurs encore éligibles (quota > 0).
    pub fn eligible(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.slots > 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.slots).sum()
    }
}
