//! DebutLab CLI — filter, annotate, and export player debut records.
//!
//! Commands:
//! - `run` — load the debut table, apply criteria, print the annotated results
//! - `options` — list the selectable values for each filter dimension

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use debutlab_core::{AgeRange, Criteria, Highlight, PresentationTable, Selection};
use debutlab_runner::{
    load_criteria, AppConfig, FileSource, RawSource, RunRequest, Session, UrlSource,
};

#[derive(Parser)]
#[command(name = "debutlab", about = "DebutLab CLI — player debut explorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply filter criteria and print the annotated results.
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Criteria TOML file. Flags below override its values.
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// Competition key ("<competition>|<country>"). Repeatable; "All" for no restriction.
        #[arg(long = "competition")]
        competitions: Vec<String>,

        /// Debut year. Repeatable.
        #[arg(long = "year")]
        years: Vec<String>,

        /// Debut month name. Repeatable.
        #[arg(long = "month")]
        months: Vec<String>,

        /// Lower age bound (inclusive).
        #[arg(long)]
        age_min: Option<u32>,

        /// Upper age bound (inclusive).
        #[arg(long)]
        age_max: Option<u32>,

        /// Minimum minutes played.
        #[arg(long)]
        min_minutes: Option<u32>,

        /// Print the presentation table as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write filtered_debutants.csv into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List competitions, years, months, and ranges present in the data.
    Options {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Local CSV file with the raw debut records.
    #[arg(long, conflicts_with = "url")]
    data: Option<PathBuf>,

    /// HTTP(S) URL of the raw debut records.
    #[arg(long)]
    url: Option<String>,

    /// Application config (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            source,
            criteria,
            competitions,
            years,
            months,
            age_min,
            age_max,
            min_minutes,
            json,
            export,
        } => {
            let overrides = CriteriaFlags {
                competitions,
                years,
                months,
                age_min,
                age_max,
                min_minutes,
            };
            run_cmd(source, criteria, overrides, json, export)
        }
        Commands::Options { source } => options_cmd(source),
    }
}

fn init_tracing() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(args: SourceArgs) -> Result<Session> {
    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let source: Box<dyn RawSource> = match (args.data, args.url) {
        (Some(path), _) => Box::new(FileSource::new(path)),
        (None, Some(url)) => Box::new(UrlSource::new(url)),
        (None, None) => match config.source.clone() {
            Some(source) => source.into_source()?,
            None => bail!("no data source: pass --data, --url, or a config with [source]"),
        },
    };

    Session::load(source.as_ref(), &config)
        .with_context(|| format!("loading debut records from {}", source.describe()))
}

struct CriteriaFlags {
    competitions: Vec<String>,
    years: Vec<String>,
    months: Vec<String>,
    age_min: Option<u32>,
    age_max: Option<u32>,
    min_minutes: Option<u32>,
}

impl CriteriaFlags {
    /// Layer the flags over `base`. A dimension left unset on the command
    /// line keeps the base value.
    fn apply(self, mut base: Criteria, session: &Session) -> Criteria {
        if !self.competitions.is_empty() {
            base.competitions = Selection::from_values(self.competitions);
        }
        if !self.years.is_empty() {
            base.years = Selection::from_values(self.years);
        }
        if !self.months.is_empty() {
            base.months = Selection::from_values(self.months);
        }
        if self.age_min.is_some() || self.age_max.is_some() {
            let observed = session.options().age;
            let current = base.age.or(observed).unwrap_or(AgeRange::new(0, u32::MAX));
            base.age = Some(AgeRange::new(
                self.age_min.unwrap_or(current.min),
                self.age_max.unwrap_or(current.max),
            ));
        }
        if self.min_minutes.is_some() {
            base.min_minutes = self.min_minutes;
        }
        base
    }
}

fn run_cmd(
    source: SourceArgs,
    criteria_path: Option<PathBuf>,
    flags: CriteriaFlags,
    json: bool,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let mut session = open_session(source)?;

    let base = match &criteria_path {
        Some(path) => load_criteria(path)
            .with_context(|| format!("loading criteria {}", path.display()))?,
        None => Criteria::default(),
    };
    let criteria = flags.apply(base, &session);

    let Some(outcome) = session.submit(RunRequest::run(criteria)) else {
        bail!("run produced no outcome");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.table)?);
    } else {
        print_table(&outcome.table);
        println!(
            "\n{} rows ({} increased, {} decreased)",
            outcome.row_count,
            outcome.annotation.count(Highlight::Increased),
            outcome.annotation.count(Highlight::Decreased),
        );
    }

    if let Some(dir) = export_dir {
        let artifact = session.export()?;
        let path = artifact.write_to_dir(&dir)?;
        eprintln!("Exported {} ({})", path.display(), artifact.content_type);
    }

    Ok(())
}

fn options_cmd(source: SourceArgs) -> Result<()> {
    let session = open_session(source)?;
    let options = session.options();

    println!("Competitions:");
    for c in &options.competitions {
        println!("  {:<40} {}", c.label, c.key);
    }

    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    println!("Years:   {}", years.join(", "));
    println!("Months:  {}", options.months.join(", "));

    match options.age {
        Some(age) => println!("Age:     {}-{}", age.min, age.max),
        None => println!("Age:     n/a"),
    }
    match options.max_minutes {
        Some(max) => println!("Minutes: 0-{max}"),
        None => println!("Minutes: n/a"),
    }

    Ok(())
}

fn print_table(table: &PresentationTable) {
    let headers = table.headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &mut dyn Iterator<Item = &str>| -> String {
        cells
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("  {}", line(&mut headers.iter().copied()));
    for row in &table.rows {
        let marker = match row.highlight {
            Highlight::Increased => '▲',
            Highlight::Decreased => '▼',
            Highlight::Neutral => ' ',
        };
        println!("{marker} {}", line(&mut row.cells.iter().map(String::as_str)));
    }
}
