use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cornell_catalog::api::{
    AcademicCareer, AcademicGroup, CatalogCollector, CatalogConfig, CatalogData, CatalogFetcher,
    CatalogRecord, Class, ClassLevel, Filters, RecordKind, Roster, Subject,
};
use serde::Serialize;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cornell-catalog", version, about = "Fetches the Cornell class roster catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch every roster, subject and class
    Collect {
        /// Maximum concurrent class fetches (defaults to CORNELL_DOWNLOAD_LIMIT or 20)
        #[arg(long)]
        limit: Option<usize>,
        /// Print the whole catalog as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Fetch a single route and print its records as JSON
    Fetch {
        /// Record type: rosters, subjects, classes, acad-careers, acad-groups, class-levels
        kind: String,
        #[arg(long)]
        roster: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Print the records as returned, without decoding them
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cornell_catalog=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CatalogConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Collect { limit, json } => {
            let fetcher = CatalogFetcher::new(config)?;
            let collector = match limit {
                Some(limit) => CatalogCollector::with_limit(fetcher, limit),
                None => CatalogCollector::new(fetcher),
            };
            let data = collector.collect_all().await?;
            if json {
                print_json(&data.snapshot())?;
            } else {
                print_summary(&data)?;
            }
        }
        Command::Fetch {
            kind,
            roster,
            subject,
            raw,
        } => {
            let kind: RecordKind = kind.parse()?;
            let filters = Filters { roster, subject };
            let fetcher = CatalogFetcher::new(config)?;
            info!(kind = %kind, filters = %filters, "Fetching single route");

            if raw {
                print_json(&fetcher.fetch_raw(kind, &filters).await?)?;
            } else {
                match kind {
                    RecordKind::Roster => fetch_and_print::<Roster>(&fetcher, &filters).await?,
                    RecordKind::AcademicCareer => {
                        fetch_and_print::<AcademicCareer>(&fetcher, &filters).await?
                    }
                    RecordKind::AcademicGroup => {
                        fetch_and_print::<AcademicGroup>(&fetcher, &filters).await?
                    }
                    RecordKind::ClassLevel => {
                        fetch_and_print::<ClassLevel>(&fetcher, &filters).await?
                    }
                    RecordKind::Subject => fetch_and_print::<Subject>(&fetcher, &filters).await?,
                    RecordKind::Class => fetch_and_print::<Class>(&fetcher, &filters).await?,
                }
            }
        }
    }

    Ok(())
}

async fn fetch_and_print<T>(fetcher: &CatalogFetcher, filters: &Filters) -> Result<()>
where
    T: CatalogRecord + Serialize,
{
    let records: Vec<T> = fetcher.fetch(filters).await?;
    let kind = T::KIND;
    info!(kind = %kind, records = records.len(), "Fetched records");
    print_json(&records)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_summary(data: &CatalogData) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let snapshot = data.snapshot();

    for entry in &snapshot.rosters {
        let classes: usize = entry.subjects.iter().map(|s| s.classes.len()).sum();
        writeln!(
            out,
            "{:<8} {:<28} {:>4} subjects {:>6} classes",
            entry.roster.slug,
            entry.roster.descr,
            entry.subjects.len(),
            classes
        )?;
    }
    writeln!(
        out,
        "{} rosters, {} classes",
        data.len(),
        data.class_count()
    )?;
    Ok(())
}
