use crate::matching::MatchingError;
use crate::model::{JobId, PreferenceTier, WorkerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pondérations de la matrice de coûts (coût faible = affectation souhaitable).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Coût ajouté par rang de préséance (rang 0 = plus prioritaire).
    pub precedence: f64,
    pub first_choice: f64,
    pub second_choice: f64,
    pub third_choice: f64,
    pub avoid: f64,
    pub neutral: f64,
    /// Écart strict entre la pire case forcée et la meilleure case libre.
    pub forced_margin: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            precedence: 5.0,
            first_choice: -3.0,
            second_choice: -2.0,
            third_choice: -1.0,
            avoid: 20.0,
            neutral: 0.0,
            forced_margin: 1.0,
        }
    }
}

impl Weights {
    pub fn adjustment(&self, tier: Option<PreferenceTier>) -> f64 {
        match tier {
            Some(PreferenceTier::First) => self.first_choice,
            Some(PreferenceTier::Second) => self.second_choice,
            Some(PreferenceTier::Third) => self.third_choice,
            Some(PreferenceTier::Avoid) => self.avoid,
            None => self.neutral,
        }
    }

    pub fn validate(&self) -> Result<(), SchedError> {
        let all = [
            self.precedence,
            self.first_choice,
            self.second_choice,
            self.third_choice,
            self.avoid,
            self.neutral,
            self.forced_margin,
        ];
        if all.iter().any(|w| !w.is_finite()) {
            return Err(SchedError::InvalidWeights("weights must be finite"));
        }
        if self.precedence < 0.0 {
            return Err(SchedError::InvalidWeights("precedence weight must be >= 0"));
        }
        let ordered = self.first_choice <= self.second_choice
            && self.second_choice <= self.third_choice
            && self.third_choice <= self.neutral
            && self.neutral <= self.avoid;
        if !ordered {
            return Err(SchedError::InvalidWeights(
                "expected first <= second <= third <= neutral <= avoid",
            ));
        }
        if self.forced_margin <= 0.0 {
            return Err(SchedError::InvalidWeights("forced margin must be > 0"));
        }
        Ok(())
    }
}

/// Conduite à tenir quand moins de travailleurs éligibles que de postes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Erreur `UnderSubscription`.
    #[default]
    Fail,
    /// Couplage partiel, cases vides pour la période.
    Partial,
}

/// Options d'affectation
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignOptions {
    pub weights: Weights,
    pub shortfall: ShortfallPolicy,
}

/// Écart entre le quota attribué et le nombre réel de créneaux.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessMismatch {
    pub worker: WorkerId,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    #[error("unknown worker: {0}")]
    UnknownWorker(String),
    #[error("duplicate worker: {0}")]
    DuplicateWorker(String),
    #[error("duplicate job: {0}")]
    DuplicateJob(String),
    #[error("worker {worker} lists job {job} in more than one preference tier")]
    ConflictingPreference { worker: WorkerId, job: JobId },
    #[error("invalid weights: {0}")]
    InvalidWeights(&'static str),
    #[error("period {period}: {eligible} eligible worker(s) for {jobs} job(s)")]
    UnderSubscription {
        period: usize,
        eligible: usize,
        jobs: usize,
    },
    #[error(transparent)]
    Solver(#[from] MatchingError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Weights::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let w: Weights = serde_json::from_str(r#"{ "avoid": 100.0, "first_choice": -6.0 }"#).unwrap();
        assert_eq!(w.avoid, 100.0);
        assert_eq!(w.first_choice, -6.0);
        assert_eq!(w.precedence, Weights::default().precedence);
        w.validate().unwrap();
    }

    #[test]
    fn out_of_order_tiers_are_rejected() {
        let w = Weights {
            second_choice: -5.0,
            ..Weights::default()
        };
        assert!(matches!(w.validate(), Err(SchedError::InvalidWeights(_))));
    }
}
