use crate::model::{JobId, WorkerId};
use crate::scheduler::{FairnessMismatch, Outcome, PoolEntry};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use uuid::Uuid;

/// Trace d'un calcul, exportable en JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub periods: usize,
    pub labels: Vec<String>,
    pub entitlement: Vec<PoolEntry>,
    pub schedule: Vec<ScheduleRow>,
    #[serde(default)]
    pub mismatches: Vec<FairnessMismatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub job: JobId,
    pub workers: Vec<Option<WorkerId>>,
}

/// Permet de customiser le rendu du résumé (texte, markdown, etc.).
pub trait ReportRenderer {
    fn render(&self, report: &RunReport) -> String;
}

/// Résumé texte : grille puis écarts d'équité.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSummary;

impl ReportRenderer for TextSummary {
    fn render(&self, report: &RunReport) -> String {
        let mut out = String::new();
        let width = report
            .schedule
            .iter()
            .map(|r| r.job.as_str().chars().count())
            .max()
            .unwrap_or(0);

        let _ = writeln!(out, "{:width$} | {}", "", report.labels.join(" | "));
        for row in &report.schedule {
            let cells: Vec<&str> = row
                .workers
                .iter()
                .map(|w| w.as_ref().map_or("-", WorkerId::as_str))
                .collect();
            let _ = writeln!(out, "{:width$} | {}", row.job.as_str(), cells.join(" | "));
        }

        if report.mismatches.is_empty() {
            out.push_str("OK: every worker got their entitlement\n");
        } else {
            let _ = writeln!(out, "{} fairness mismatch(es):", report.mismatches.len());
            for m in &report.mismatches {
                let _ = writeln!(
                    out,
                    "  {}: expected {}, got {}",
                    m.worker, m.expected, m.actual
                );
            }
        }
        out
    }
}

/// Prépare le rapport d'un calcul terminé.
pub fn prepare_report(outcome: &Outcome, labels: Vec<String>, now: DateTime<Utc>) -> Result<RunReport> {
    let periods = outcome.schedule.periods();
    if labels.len() != periods {
        bail!("{} label(s) for {} period(s)", labels.len(), periods);
    }
    let schedule = outcome
        .schedule
        .rows()
        .map(|(job, row)| ScheduleRow {
            job: job.clone(),
            workers: row.to_vec(),
        })
        .collect();
    Ok(RunReport {
        run_id: Uuid::new_v4(),
        generated_at: now,
        periods,
        labels,
        entitlement: outcome.entitlement.entries().to_vec(),
        schedule,
        mismatches: outcome.mismatches.clone(),
    })
}

/// Export JSON du rapport (jolie mise en forme)
pub fn export_report_json<P: AsRef<Path>>(path: P, report: &RunReport) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    crate::storage::write_atomic(path.as_ref(), &json)
}
