use super::SchedError;
use crate::model::{JobId, PreferenceRecord, WorkerId};
use std::collections::{HashMap, HashSet};

/// Réordonne les vœux selon la liste de préséance (index 0 = prioritaire).
///
/// La liste fait foi : un vœu d'un inconnu est une erreur, un travailleur
/// sans vœu reçoit un enregistrement neutre.
pub(crate) fn order_by_precedence(
    workers: &[WorkerId],
    records: &[PreferenceRecord],
) -> Result<Vec<PreferenceRecord>, SchedError> {
    let mut rank: HashMap<&WorkerId, usize> = HashMap::with_capacity(workers.len());
    for (idx, worker) in workers.iter().enumerate() {
        if rank.insert(worker, idx).is_some() {
            return Err(SchedError::DuplicateWorker(worker.to_string()));
        }
    }

    let mut slots: Vec<Option<PreferenceRecord>> = vec![None; workers.len()];
    for record in records {
        let Some(&idx) = rank.get(&record.worker) else {
            return Err(SchedError::UnknownWorker(record.worker.to_string()));
        };
        if slots[idx].is_some() {
            return Err(SchedError::DuplicateWorker(record.worker.to_string()));
        }
        if let Some(job) = record.repeated_job() {
            return Err(SchedError::ConflictingPreference {
                worker: record.worker.clone(),
                job: job.clone(),
            });
        }
        slots[idx] = Some(record.clone());
    }

    Ok(slots
        .into_iter()
        .zip(workers)
        .map(|(slot, worker)| slot.unwrap_or_else(|| PreferenceRecord::neutral(worker.clone())))
        .collect())
}

pub(crate) fn ensure_unique_jobs(jobs: &[JobId]) -> Result<(), SchedError> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(job) {
            return Err(SchedError::DuplicateJob(job.to_string()));
        }
    }
    Ok(())
}

/// Vœux citant un poste absent de la liste (ignorés au calcul).
pub(crate) fn unknown_choices<'a>(
    records: &'a [PreferenceRecord],
    jobs: &[JobId],
) -> Vec<(&'a WorkerId, &'a JobId)> {
    records
        .iter()
        .flat_map(|r| r.tiers().map(move |(_, job)| (&r.worker, job)))
        .filter(|(_, job)| !jobs.contains(*job))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<WorkerId> {
        names.iter().map(WorkerId::new).collect()
    }

    #[test]
    fn records_follow_the_precedence_list() {
        let workers = ids(&["carol", "alice", "bob"]);
        let records = vec![
            PreferenceRecord::neutral(WorkerId::new("alice")),
            PreferenceRecord::neutral(WorkerId::new("bob")),
            PreferenceRecord::neutral(WorkerId::new("carol")),
        ];
        let ordered = order_by_precedence(&workers, &records).unwrap();
        let names: Vec<&str> = ordered.iter().map(|r| r.worker.as_str()).collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }

    #[test]
    fn missing_record_becomes_neutral() {
        let workers = ids(&["alice", "bob"]);
        let mut alice = PreferenceRecord::neutral(WorkerId::new("alice"));
        alice.first = Some(JobId::new("till"));
        let ordered = order_by_precedence(&workers, &[alice.clone()]).unwrap();
        assert_eq!(ordered[0], alice);
        assert_eq!(ordered[1], PreferenceRecord::neutral(WorkerId::new("bob")));
    }

    #[test]
    fn unknown_worker_is_rejected() {
        let workers = ids(&["alice"]);
        let err = order_by_precedence(&workers, &[PreferenceRecord::neutral(WorkerId::new("zoe"))])
            .unwrap_err();
        assert!(matches!(err, SchedError::UnknownWorker(name) if name == "zoe"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = order_by_precedence(&ids(&["alice", "alice"]), &[]).unwrap_err();
        assert!(matches!(err, SchedError::DuplicateWorker(_)));

        let rec = PreferenceRecord::neutral(WorkerId::new("alice"));
        let err = order_by_precedence(&ids(&["alice"]), &[rec.clone(), rec]).unwrap_err();
        assert!(matches!(err, SchedError::DuplicateWorker(_)));
    }

    #[test]
    fn same_job_in_two_tiers_is_rejected() {
        let mut rec = PreferenceRecord::neutral(WorkerId::new("alice"));
        rec.first = Some(JobId::new("till"));
        rec.avoid = Some(JobId::new("till"));
        let err = order_by_precedence(&ids(&["alice"]), &[rec]).unwrap_err();
        assert!(matches!(err, SchedError::ConflictingPreference { .. }));
    }
}
