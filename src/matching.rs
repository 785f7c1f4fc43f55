//! Couplage biparti de coût minimal.
//!
//! Le moteur ne dépend que du trait [`MatchingSolver`] ; [`HungarianSolver`]
//! en est l'implémentation de référence (méthode hongroise primal-dual,
//! O(n²·m) pour n ≤ m).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    #[error("non-finite cost at row {row}, column {col}")]
    NonFinite { row: usize, col: usize },
    #[error("invalid assignment: {0}")]
    InvalidAssignment(&'static str),
}

/// Matrice de coûts dense `rows × cols`, stockée ligne par ligne.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Construit depuis des lignes ; toutes doivent avoir la même longueur.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatchingError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(MatchingError::InvalidAssignment("ragged cost matrix"));
        }
        let n = rows.len();
        Ok(Self {
            rows: n,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn transposed(&self) -> Self {
        let mut out = Self::filled(self.cols, self.rows, 0.0);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// Coût total d'un ensemble de paires (ligne, colonne).
    pub fn total(&self, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(r, c)| self.get(r, c)).sum()
    }
}

/// Contrat du solveur : `min(rows, cols)` paires (ligne, colonne) distinctes
/// minimisant le coût total.
pub trait MatchingSolver {
    fn solve(&self, costs: &CostMatrix) -> Result<Vec<(usize, usize)>, MatchingError>;
}

/// Méthode hongroise (potentiels + chemins augmentants).
///
/// Déterministe : à coût égal, la colonne d'indice le plus faible l'emporte.
#[derive(Debug, Default, Clone, Copy)]
pub struct HungarianSolver;

impl MatchingSolver for HungarianSolver {
    fn solve(&self, costs: &CostMatrix) -> Result<Vec<(usize, usize)>, MatchingError> {
        for r in 0..costs.rows() {
            if let Some(c) = costs.row(r).iter().position(|v| !v.is_finite()) {
                return Err(MatchingError::NonFinite { row: r, col: c });
            }
        }
        if costs.rows() == 0 || costs.cols() == 0 {
            return Ok(Vec::new());
        }

        let mut pairs = if costs.rows() <= costs.cols() {
            hungarian(costs)
        } else {
            hungarian(&costs.transposed())
                .into_iter()
                .map(|(c, r)| (r, c))
                .collect()
        };
        pairs.sort_unstable();
        Ok(pairs)
    }
}

/// Requiert `rows <= cols` ; renvoie une paire par ligne.
fn hungarian(a: &CostMatrix) -> Vec<(usize, usize)> {
    let n = a.rows();
    let m = a.cols();
    // indices base 1, la colonne 0 est fictive
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = a.get(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| (p[j] - 1, j - 1))
        .collect()
}

/// Vérifie qu'une sortie de solveur respecte le contrat.
pub fn validate_assignment(
    costs: &CostMatrix,
    pairs: &[(usize, usize)],
) -> Result<(), MatchingError> {
    if pairs.len() != costs.rows().min(costs.cols()) {
        return Err(MatchingError::InvalidAssignment("wrong number of pairs"));
    }
    let mut rows_seen = vec![false; costs.rows()];
    let mut cols_seen = vec![false; costs.cols()];
    for &(r, c) in pairs {
        if r >= costs.rows() || c >= costs.cols() {
            return Err(MatchingError::InvalidAssignment("index out of bounds"));
        }
        if rows_seen[r] || cols_seen[c] {
            return Err(MatchingError::InvalidAssignment("row or column used twice"));
        }
        rows_seen[r] = true;
        cols_seen[c] = true;
    }
    Ok(())
}
