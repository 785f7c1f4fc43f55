use crate::model::{JobId, PreferenceRecord, Schedule, WorkerId};
use crate::storage::write_atomic;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// En-tête attendu du fichier de vœux.
pub const REQUEST_HEADER: [&str; 5] = ["Name", "Choice1", "Choice2", "Choice3", "ChoiceLast"];

/// Liste de noms, un par ligne (espaces rognés, lignes vides ignorées).
fn load_names<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Travailleurs par ordre de préséance (le premier est prioritaire).
pub fn load_workers<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<WorkerId>> {
    Ok(load_names(path)?.into_iter().map(WorkerId::new).collect())
}

pub fn load_jobs<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<JobId>> {
    Ok(load_names(path)?.into_iter().map(JobId::new).collect())
}

#[derive(Debug, Deserialize)]
struct RequestRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Choice1")]
    choice1: String,
    #[serde(rename = "Choice2")]
    choice2: String,
    #[serde(rename = "Choice3")]
    choice3: String,
    #[serde(rename = "ChoiceLast")]
    choice_last: String,
}

fn choice(raw: &str) -> Option<JobId> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| JobId::new(raw))
}

/// Import des vœux: header `Name,Choice1,Choice2,Choice3,ChoiceLast`
pub fn import_requests_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<PreferenceRecord>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let header = rdr.headers()?.clone();
    if !header.iter().eq(REQUEST_HEADER.iter().copied()) {
        bail!(
            "unexpected request header in {}: got `{}`, expected `{}`",
            path.display(),
            header.iter().collect::<Vec<_>>().join(","),
            REQUEST_HEADER.join(",")
        );
    }

    let mut out = Vec::new();
    for (line, row) in rdr.deserialize::<RequestRow>().enumerate() {
        let row = row.with_context(|| format!("request row {}", line + 2))?;
        if row.name.trim().is_empty() {
            bail!("request row {} has an empty Name", line + 2);
        }
        out.push(PreferenceRecord {
            worker: WorkerId::new(&row.name),
            first: choice(&row.choice1),
            second: choice(&row.choice2),
            third: choice(&row.choice3),
            avoid: choice(&row.choice_last),
        });
    }
    Ok(out)
}

fn render_schedule_csv(schedule: &Schedule, labels: &[String]) -> anyhow::Result<Vec<u8>> {
    if labels.len() != schedule.periods() {
        bail!(
            "{} label(s) for a schedule of {} period(s)",
            labels.len(),
            schedule.periods()
        );
    }
    let mut w = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    let mut header = Vec::with_capacity(labels.len() + 1);
    header.push("");
    header.extend(labels.iter().map(String::as_str));
    w.write_record(&header)?;

    for (job, row) in schedule.rows() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(job.as_str());
        record.extend(row.iter().map(|c| c.as_ref().map_or("", WorkerId::as_str)));
        w.write_record(&record)?;
    }
    w.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing schedule csv: {}", e.error()))
}

/// Export CSV de la grille: header `,<label 1>,…,<label n>`, une ligne par poste
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    schedule: &Schedule,
    labels: &[String],
) -> anyhow::Result<()> {
    let bytes = render_schedule_csv(schedule, labels)?;
    write_atomic(path.as_ref(), &bytes)
}

pub fn schedule_to_csv_string(schedule: &Schedule, labels: &[String]) -> anyhow::Result<String> {
    let bytes = render_schedule_csv(schedule, labels)?;
    String::from_utf8(bytes).context("schedule csv is not utf-8")
}

/// Import d'une grille exportée ; les en-têtes de période sont renvoyés tels quels.
pub fn import_schedule_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<(Schedule, Vec<String>)> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let labels: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_owned).collect();
    let mut jobs = Vec::new();
    let mut rows: Vec<Vec<Option<WorkerId>>> = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("schedule row {}", line + 2))?;
        let job = rec.get(0).context("missing job name")?;
        if rec.len() != labels.len() + 1 {
            bail!(
                "schedule row {} ({job}) has {} cell(s), expected {}",
                line + 2,
                rec.len().saturating_sub(1),
                labels.len()
            );
        }
        jobs.push(JobId::new(job));
        rows.push(
            rec.iter()
                .skip(1)
                .map(|cell| (!cell.is_empty()).then(|| WorkerId::new(cell)))
                .collect(),
        );
    }

    let mut schedule = Schedule::new(jobs);
    for period in 0..labels.len() {
        schedule.push_period(rows.iter().map(|r| r[period].clone()).collect());
    }
    Ok((schedule, labels))
}
