use super::{Pool, Weights};
use crate::matching::CostMatrix;
use crate::model::{JobId, PreferenceRecord};

/// Ligne de la matrice : un travailleur éligible.
pub(crate) struct Candidate<'a> {
    pub rank: usize,
    pub record: &'a PreferenceRecord,
}

/// Matrice `éligibles × postes` pour une période.
///
/// Coût normal : `precedence × rang + ajustement(vœu)`. Un travailleur dont
/// le quota restant égale le nombre de périodes restantes (courante incluse)
/// est forcé : sa ligne est décalée de `écart + marge`, où `écart` est
/// l'amplitude des coûts normaux de la matrice. Toute case forcée passe donc
/// strictement sous toute case libre, sans perdre le gradient de préséance
/// ni les vœux.
pub(crate) fn build_cost_matrix(
    candidates: &[Candidate<'_>],
    jobs: &[JobId],
    pool: &Pool,
    periods_remaining: usize,
    weights: &Weights,
) -> CostMatrix {
    let mut matrix = CostMatrix::filled(candidates.len(), jobs.len(), 0.0);
    for (row, candidate) in candidates.iter().enumerate() {
        let base = weights.precedence * candidate.rank as f64;
        for (col, job) in jobs.iter().enumerate() {
            let adjust = weights.adjustment(candidate.record.tier_for(job));
            matrix.set(row, col, base + adjust);
        }
    }

    let forced: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| is_forced(pool.remaining(c.rank), periods_remaining))
        .map(|(row, _)| row)
        .collect();
    if forced.is_empty() {
        return matrix;
    }

    let offset = span(matrix.values()) + weights.forced_margin;
    for row in forced {
        for col in 0..jobs.len() {
            let value = matrix.get(row, col);
            matrix.set(row, col, value - offset);
        }
    }
    matrix
}

pub(crate) fn is_forced(remaining_slots: usize, periods_remaining: usize) -> bool {
    remaining_slots > 0 && remaining_slots == periods_remaining
}

fn span(values: &[f64]) -> f64 {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() {
        hi - lo
    } else {
        0.0
    }
}
