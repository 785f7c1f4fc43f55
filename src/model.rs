use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort pour un travailleur (son nom, unique)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour un poste (son nom, unique)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Niveau de préférence d'un travailleur pour un poste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceTier {
    First,
    Second,
    Third,
    Avoid,
}

/// Vœux d'un travailleur : trois choix classés et un poste à éviter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub worker: WorkerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid: Option<JobId>,
}

impl PreferenceRecord {
    /// Aucun vœu : tous les postes sont neutres.
    pub fn neutral(worker: WorkerId) -> Self {
        Self {
            worker,
            first: None,
            second: None,
            third: None,
            avoid: None,
        }
    }

    pub fn tiers(&self) -> impl Iterator<Item = (PreferenceTier, &JobId)> {
        [
            (PreferenceTier::First, self.first.as_ref()),
            (PreferenceTier::Second, self.second.as_ref()),
            (PreferenceTier::Third, self.third.as_ref()),
            (PreferenceTier::Avoid, self.avoid.as_ref()),
        ]
        .into_iter()
        .filter_map(|(tier, job)| job.map(|j| (tier, j)))
    }

    /// Niveau de préférence pour `job`, `None` si neutre.
    pub fn tier_for(&self, job: &JobId) -> Option<PreferenceTier> {
        self.tiers().find(|(_, j)| *j == job).map(|(tier, _)| tier)
    }

    /// Premier poste cité dans plusieurs niveaux, s'il existe.
    pub fn repeated_job(&self) -> Option<&JobId> {
        let jobs: Vec<&JobId> = self.tiers().map(|(_, j)| j).collect();
        for (idx, job) in jobs.iter().enumerate() {
            if jobs[idx + 1..].contains(job) {
                return Some(*job);
            }
        }
        None
    }
}

/// Entrées d'un calcul : travailleurs par ordre de préséance, postes, vœux.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub workers: Vec<WorkerId>,
    pub jobs: Vec<JobId>,
    #[serde(default)]
    pub preferences: Vec<PreferenceRecord>,
}

impl Roster {
    pub fn find_preferences<'a>(&'a self, worker: &WorkerId) -> Option<&'a PreferenceRecord> {
        self.preferences.iter().find(|p| &p.worker == worker)
    }
}

/// Grille finale : pour chaque poste, un occupant par période.
///
/// Une case vide (`None`) n'apparaît qu'en mode de pénurie tolérée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    jobs: Vec<JobId>,
    slots: Vec<Vec<Option<WorkerId>>>,
}

impl Schedule {
    pub fn new(jobs: Vec<JobId>) -> Self {
        let slots = vec![Vec::new(); jobs.len()];
        Self { jobs, slots }
    }

    /// Ajoute une période ; `column[j]` est l'occupant du poste `j`.
    pub fn push_period(&mut self, column: Vec<Option<WorkerId>>) {
        debug_assert_eq!(column.len(), self.jobs.len());
        for (row, cell) in self.slots.iter_mut().zip(column) {
            row.push(cell);
        }
    }

    pub fn jobs(&self) -> &[JobId] {
        &self.jobs
    }

    pub fn periods(&self) -> usize {
        self.slots.first().map_or(0, Vec::len)
    }

    /// Occupants d'un poste, dans l'ordre chronologique.
    pub fn get(&self, job: &JobId) -> Option<&[Option<WorkerId>]> {
        let idx = self.jobs.iter().position(|j| j == job)?;
        Some(&self.slots[idx])
    }

    pub fn rows(&self) -> impl Iterator<Item = (&JobId, &[Option<WorkerId>])> {
        self.jobs.iter().zip(self.slots.iter().map(Vec::as_slice))
    }

    /// Travailleurs affectés pendant la période `period` (base 0).
    pub fn period(&self, period: usize) -> Vec<Option<&WorkerId>> {
        self.slots
            .iter()
            .map(|row| row.get(period).and_then(Option::as_ref))
            .collect()
    }

    pub fn filled_slots(&self) -> usize {
        self.slots.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Nombre de créneaux effectués par `worker`.
    pub fn count_for(&self, worker: &WorkerId) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|c| c.as_ref() == Some(worker))
            .count()
    }
}
