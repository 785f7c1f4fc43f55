#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rotamatch::{
    io,
    labels::{load_labels_from_file, parse_start_time, PeriodLabels},
    model::Roster,
    report::{export_report_json, prepare_report, ReportRenderer, TextSummary},
    scheduler::{AssignOptions, Scheduler, ShortfallPolicy, Weights},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de répartition de postes par couplage optimal
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct Inputs {
    /// Roster JSON (remplace les trois fichiers ci-dessous)
    #[arg(long)]
    roster: Option<String>,
    /// Travailleurs, un par ligne, par ordre de préséance
    #[arg(long, default_value = "workers.txt")]
    workers: String,
    /// Postes, un par ligne
    #[arg(long, default_value = "joblist.txt")]
    jobs: String,
    /// Vœux CSV: Name,Choice1,Choice2,Choice3,ChoiceLast
    #[arg(long, default_value = "requests.csv")]
    requests: String,
}

impl Inputs {
    fn load(&self) -> Result<Roster> {
        if let Some(path) = &self.roster {
            return JsonStorage::open(path)?.load();
        }
        Ok(Roster {
            workers: io::load_workers(&self.workers)?,
            jobs: io::load_jobs(&self.jobs)?,
            preferences: io::import_requests_csv(&self.requests)?,
        })
    }
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Fichier d'en-têtes de période, un par ligne
    #[arg(long, conflicts_with = "start")]
    labels: Option<String>,
    /// Heure de début du premier créneau (HH:MM)
    #[arg(long)]
    start: Option<String>,
    #[arg(long, default_value_t = 30)]
    interval_minutes: u32,
    /// Fin affichée du dernier créneau (ex. "Close")
    #[arg(long, requires = "start")]
    last_end: Option<String>,
}

impl LabelArgs {
    fn resolve(&self) -> Result<PeriodLabels> {
        if let Some(path) = &self.labels {
            return load_labels_from_file(path);
        }
        if let Some(start) = &self.start {
            return Ok(PeriodLabels::Intervals {
                start: parse_start_time(start)?,
                minutes: self.interval_minutes,
                last_end: self.last_end.clone(),
            });
        }
        Ok(PeriodLabels::Numbered)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer la grille
    Run {
        /// Nombre de périodes
        #[arg(default_value_t = 6)]
        periods: usize,
        #[command(flatten)]
        inputs: Inputs,
        /// Grille CSV produite
        #[arg(long, default_value = "schedule.csv")]
        output: String,
        /// Pondérations JSON (champs absents = valeurs par défaut)
        #[arg(long)]
        weights: Option<String>,
        /// Tolère moins de travailleurs éligibles que de postes
        #[arg(long)]
        allow_shortfall: bool,
        #[command(flatten)]
        labels: LabelArgs,
        /// Rapport JSON (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Regrouper les entrées dans un roster JSON
    Pack {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, default_value = "roster.json")]
        out: String,
    },

    /// Vérifier les quotas d'une grille existante
    Check {
        /// Grille CSV à vérifier
        #[arg(long)]
        schedule: String,
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn load_weights(path: &str) -> Result<Weights> {
    let data = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing weights {path}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Run {
            periods,
            inputs,
            output,
            weights,
            allow_shortfall,
            labels,
            report,
        } => {
            let opts = AssignOptions {
                weights: match weights {
                    Some(path) => load_weights(&path)?,
                    None => Weights::default(),
                },
                shortfall: if allow_shortfall {
                    ShortfallPolicy::Partial
                } else {
                    ShortfallPolicy::Fail
                },
            };
            let labels = labels.resolve()?.render(periods)?;
            let scheduler = Scheduler::new(inputs.load()?).with_options(opts);
            let outcome = scheduler.assign(periods)?;

            io::export_schedule_csv(&output, &outcome.schedule, &labels)?;
            let run = prepare_report(&outcome, labels, Utc::now())?;
            if let Some(path) = report {
                export_report_json(path, &run)?;
            }
            print!("{}", TextSummary.render(&run));
            // Code 2 = WARNING/INCOMPLETE
            if run.mismatches.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::Pack { inputs, out } => {
            let roster = inputs.load()?;
            JsonStorage::open(&out)?.save(&roster)?;
            println!(
                "Packed {} worker(s), {} job(s), {} request(s) into {}",
                roster.workers.len(),
                roster.jobs.len(),
                roster.preferences.len(),
                out
            );
            0
        }
        Commands::Check { schedule, inputs } => {
            let (grid, _) = io::import_schedule_csv(&schedule)?;
            let scheduler = Scheduler::new(inputs.load()?);
            let mismatches = scheduler.check(&grid)?;
            if mismatches.is_empty() {
                println!("OK: every worker got their entitlement");
                0
            } else {
                eprintln!("Found {} mismatch(es)", mismatches.len());
                for m in &mismatches {
                    println!("{}: expected {}, got {}", m.worker, m.expected, m.actual);
                }
                2
            }
        }
    };

    std::process::exit(code);
}
