//! CuraLink: research and clinical-trial lookup from the command line.
//! Every command prints JSON to stdout; logs go to stderr.

mod app;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use curalink_common::{CanonicalPublication, CanonicalTrial, RecordKind, UserProfile};
use curalink_config::Config;
use curalink_ingestion::{PublicationSource, TrialFilter, TrialSource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "curalink", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to $CURALINK_CONFIG or ./curalink.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search PubMed
    Publications {
        query: String,
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Add a plain-language summary to each result
        #[arg(long)]
        summarize: bool,
    },
    /// Fetch the abstract of one PubMed article
    Publication {
        pmid: String,
        /// Include the raw efetch XML
        #[arg(long)]
        xml: bool,
    },
    /// Search ClinicalTrials.gov
    Trials {
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Registry status token, e.g. RECRUITING
        #[arg(long)]
        status: Option<String>,
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        #[arg(long)]
        summarize: bool,
    },
    /// Fetch one study by NCT ID
    Trial {
        nct_id: String,
        #[arg(long)]
        summarize: bool,
    },
    /// List the medical conditions mentioned in free text
    ExtractConditions { text: String },
    /// Summarize a trial description or publication abstract
    Summarize {
        text: String,
        #[arg(long, value_enum, default_value_t = Kind::Trial)]
        kind: Kind,
    },
    /// Rank candidate records against a user profile
    Recommend {
        /// JSON file holding a user profile
        #[arg(long)]
        profile: PathBuf,
        /// JSON file holding an array of trials or publications
        #[arg(long)]
        candidates: PathBuf,
        #[arg(long, value_enum)]
        kind: Kind,
    },
    /// Report which optional features are enabled
    Capabilities,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Trial,
    Publication,
}

impl From<Kind> for RecordKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Trial       => RecordKind::Trial,
            Kind::Publication => RecordKind::Publication,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("curalink=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Could not load configuration")?;
    info!(version = env!("CARGO_PKG_VERSION"), "CuraLink starting");

    let app = App::from_config(&config)?;
    run(&app, cli.command).await
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Publications { query, max_results, summarize } => {
            let max = max_results.unwrap_or(app.max_publications);
            let mut publications = app.pubmed.search_publications(&query, max).await?;
            if summarize {
                for publication in &mut publications {
                    app.assist.enrich_publication(publication).await;
                }
            }
            print_json(&publications)
        }
        Command::Publication { pmid, xml } => {
            let mut details = app.pubmed.fetch_publication_details(&pmid).await?;
            if !xml {
                details.xml.clear();
            }
            print_json(&details)
        }
        Command::Trials { condition, location, status, max_results, summarize } => {
            let filter = TrialFilter { condition, location, status, max_results };
            let mut trials = app.trials.search_trials(&filter).await?;
            if summarize {
                for trial in &mut trials {
                    app.assist.enrich_trial(trial).await;
                }
            }
            print_json(&trials)
        }
        Command::Trial { nct_id, summarize } => {
            let mut trial = app.trials.fetch_trial(&nct_id).await?;
            if summarize {
                app.assist.enrich_trial(&mut trial).await;
            }
            print_json(&trial)
        }
        Command::ExtractConditions { text } => {
            print_json(&app.assist.extract_conditions(&text).await)
        }
        Command::Summarize { text, kind } => {
            print_json(&app.assist.generate_summary(&text, kind.into()).await)
        }
        Command::Recommend { profile, candidates, kind } => {
            let profile: UserProfile = read_json(&profile)?;
            match kind {
                Kind::Trial => {
                    let items: Vec<CanonicalTrial> = read_json(&candidates)?;
                    print_json(&app.assist.get_recommendations(&profile, items, RecordKind::Trial))
                }
                Kind::Publication => {
                    let items: Vec<CanonicalPublication> = read_json(&candidates)?;
                    print_json(&app.assist.get_recommendations(&profile, items, RecordKind::Publication))
                }
            }
        }
        Command::Capabilities => print_json(&serde_json::json!({
            "textAssist": app.assist.is_available(),
            "recommendations": true,
        })),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::parse_from([
            "curalink", "recommend", "--profile", "p.json", "--candidates", "c.json", "--kind", "publication",
        ]);
        match cli.command {
            Command::Recommend { kind, .. } => {
                assert_eq!(RecordKind::from(kind), RecordKind::Publication);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_trials_filter() {
        let cli = Cli::parse_from(["curalink", "trials", "--condition", "asthma", "-n", "5"]);
        match cli.command {
            Command::Trials { condition, location, max_results, .. } => {
                assert_eq!(condition.as_deref(), Some("asthma"));
                assert_eq!(location, None);
                assert_eq!(max_results, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
