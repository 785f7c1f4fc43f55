use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// En-têtes de colonnes des périodes dans la grille exportée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabels {
    /// `1`, `2`, … `n`
    #[default]
    Numbered,
    /// Créneaux horaires consécutifs `HH:MM-HH:MM` à partir de `start`.
    Intervals {
        start: NaiveTime,
        minutes: u32,
        /// Remplace l'heure de fin du dernier créneau (ex. `Close`).
        #[serde(default)]
        last_end: Option<String>,
    },
    Custom(Vec<String>),
}

impl PeriodLabels {
    /// Une étiquette par période.
    pub fn render(&self, periods: usize) -> Result<Vec<String>> {
        match self {
            PeriodLabels::Numbered => {
                let mut buf = itoa::Buffer::new();
                Ok((1..=periods).map(|p| buf.format(p).to_owned()).collect())
            }
            PeriodLabels::Intervals {
                start,
                minutes,
                last_end,
            } => {
                if *minutes == 0 {
                    bail!("interval length must be > 0 minutes");
                }
                let step = Duration::minutes(i64::from(*minutes));
                let mut out = Vec::with_capacity(periods);
                let mut current = *start;
                for p in 0..periods {
                    let (next, _) = current.overflowing_add_signed(step);
                    let end = match last_end {
                        Some(word) if p + 1 == periods => word.clone(),
                        _ => next.format("%H:%M").to_string(),
                    };
                    out.push(format!("{}-{}", current.format("%H:%M"), end));
                    current = next;
                }
                Ok(out)
            }
            PeriodLabels::Custom(labels) => {
                if labels.len() != periods {
                    bail!(
                        "{} period label(s) given for {} period(s)",
                        labels.len(),
                        periods
                    );
                }
                Ok(labels.clone())
            }
        }
    }
}

/// Charge des étiquettes personnalisées : une par ligne, lignes vides ignorées.
pub fn load_labels_from_file<P: AsRef<Path>>(path: P) -> Result<PeriodLabels> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading period labels {}", path.display()))?;
    let labels = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect();
    Ok(PeriodLabels::Custom(labels))
}

/// `HH:MM` ou `HH:MM:SS`.
pub fn parse_start_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid start time: {raw}"))
}
