use super::{FairnessMismatch, Pool};
use crate::model::{Schedule, WorkerId};
use tracing::warn;

/// Compare le nombre réel de créneaux de chacun à son quota initial.
///
/// Un travailleur présent dans la grille mais absent du quota est compté
/// avec un quota de 0.
pub(crate) fn check_consistency(schedule: &Schedule, entitlement: &Pool) -> Vec<FairnessMismatch> {
    let mut out = Vec::new();

    for entry in entitlement.entries() {
        let actual = schedule.count_for(&entry.worker);
        if actual != entry.slots {
            out.push(FairnessMismatch {
                worker: entry.worker.clone(),
                expected: entry.slots,
                actual,
            });
        }
    }

    let mut strangers: Vec<&WorkerId> = Vec::new();
    for (_, row) in schedule.rows() {
        for worker in row.iter().flatten() {
            if entitlement.get(worker).is_none() && !strangers.contains(&worker) {
                strangers.push(worker);
            }
        }
    }
    for worker in strangers {
        out.push(FairnessMismatch {
            worker: worker.clone(),
            expected: 0,
            actual: schedule.count_for(worker),
        });
    }

    for m in &out {
        warn!(
            worker = %m.worker,
            expected = m.expected,
            actual = m.actual,
            "fairness mismatch"
        );
    }
    out
}
