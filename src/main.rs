use anyhow::Result;
use clap::{Parser, Subcommand};
use ringside::config::load_config;
use ringside::pipeline::{MatchesOptions, ProfileOptions, SearchOptions, WrestlerClient};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ringside", about = "Wrestler career profiles scraped from cagematch")]
struct Cli {
    /// TOML config; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Search {
        query: String,
        #[arg(long)]
        min_votes: Option<i64>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        birthplace: Option<String>,
    },
    Basic {
        id: String,
    },
    Profile {
        id: String,
        #[arg(long, default_value_t = false)]
        with_championships: bool,
        #[arg(long, default_value_t = false)]
        with_timeline: bool,
    },
    Matches {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    Recent {
        id: String,
        /// Defaults to `limits.recent_matches`.
        #[arg(long)]
        limit: Option<usize>,
    },
    Championships {
        id: String,
    },
    Timeline {
        id: String,
    },
    Stats {
        id: String,
    },
    Achievements {
        id: String,
    },
    Rivalries {
        id: String,
    },
    Performance {
        id: String,
    },
    Related {
        id: String,
    },
    Featured,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let client = WrestlerClient::from_config(config)?;

    match cli.command {
        Commands::Search {
            query,
            min_votes,
            min_rating,
            birthplace,
        } => {
            let results = client.search(&SearchOptions {
                query,
                min_votes,
                min_rating,
                birthplace,
            })?;
            print_json(&results)?;
        }
        Commands::Basic { id } => print_json(&client.basic_profile(&id)?)?,
        Commands::Profile {
            id,
            with_championships,
            with_timeline,
        } => {
            let profile = client.profile(&ProfileOptions {
                id,
                include_championships: with_championships,
                include_timeline: with_timeline,
            })?;
            print_json(&profile)?;
        }
        Commands::Matches { id, page, limit } => {
            print_json(&client.matches_page(&MatchesOptions { id, page, limit })?)?
        }
        Commands::Recent { id, limit } => {
            let limit = limit.unwrap_or(client.config().limits.recent_matches);
            print_json(&client.recent_matches(&id, limit)?)?
        }
        Commands::Championships { id } => print_json(&client.championships(&id)?)?,
        Commands::Timeline { id } => print_json(&client.timeline(&id)?)?,
        Commands::Stats { id } => print_json(&client.stats(&id)?)?,
        Commands::Achievements { id } => print_json(&client.achievements(&id)?)?,
        Commands::Rivalries { id } => print_json(&client.rivalries(&id)?)?,
        Commands::Performance { id } => print_json(&client.performance(&id)?)?,
        Commands::Related { id } => print_json(&client.related(&id)?)?,
        Commands::Featured => print_json(&client.featured()?)?,
    }

    info!("done");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}
