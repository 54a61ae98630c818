//! Transfer suggestion command-line entry point
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use player_catalog::{PlayerId, Position};
use serde::Serialize;
use squad_service::TeamId;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use suggestion_service::{initialize_logging, load_config, run_batch, SuggestionService};
use transfer_engine::{player_trend, position_analysis, SuggestionRequest};

#[derive(Parser)]
#[command(name = "transfer-suggest")]
#[command(about = "Generate and manage fantasy football transfer suggestions")]
#[command(version)]
struct Cli {
    /// TOML configuration file; TRANSFER_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and store suggestions for one team
    Generate {
        #[arg(short, long)]
        team: TeamId,

        /// Maximum suggestions to return
        #[arg(short, long)]
        max: Option<usize>,

        /// Only consider players at this position (gk, def, mid, fwd)
        #[arg(short, long)]
        position: Option<Position>,
    },

    /// Generate suggestions for many teams
    Batch {
        /// Team ids; every loaded team when omitted
        #[arg(short, long, value_delimiter = ',')]
        teams: Vec<TeamId>,

        #[arg(short, long)]
        max: Option<usize>,

        /// Concurrent teams; defaults to the configured worker count
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Show stored suggestions for a team
    Show {
        #[arg(short, long)]
        team: TeamId,
    },

    /// Mark a stored suggestion as implemented
    Implement {
        #[arg(short, long)]
        team: TeamId,

        #[arg(short, long)]
        id: Uuid,
    },

    /// Delete stored suggestions past the retention period
    Cleanup {
        /// Defaults to the configured retention period
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Recent scoring trend for a player
    Trend {
        #[arg(short, long)]
        player: PlayerId,
    },

    /// Summary statistics for a position
    Analyze {
        #[arg(short, long)]
        position: Position,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!("Starting transfer-suggest v{}", env!("CARGO_PKG_VERSION"));
    let service = SuggestionService::from_config(&config).await?;

    match cli.command {
        Commands::Generate { team, max, position } => {
            let request = SuggestionRequest { max_suggestions: max, position_filter: position };
            let run = service.generate_for_team(team, &request).await?;
            print_json(&run)?;
        }
        Commands::Batch { teams, max, workers } => {
            let team_ids = if teams.is_empty() { service.team_ids() } else { teams };
            let request = SuggestionRequest { max_suggestions: max, position_filter: None };
            let workers = workers.unwrap_or(config.runner.batch_workers);
            let report = run_batch(&service, team_ids, &request, workers).await;
            print_json(&report)?;
        }
        Commands::Show { team } => {
            print_json(&service.suggestions_for_team(team).await?)?;
        }
        Commands::Implement { team, id } => {
            service.mark_implemented(team, id).await?;
            print_json(&serde_json::json!({ "team_id": team, "suggestion_id": id, "implemented": true }))?;
        }
        Commands::Cleanup { days } => {
            let days = days.unwrap_or(config.store.retention_days);
            let removed = service.cleanup(days).await?;
            print_json(&serde_json::json!({ "removed": removed, "retention_days": days }))?;
        }
        Commands::Trend { player } => {
            print_json(&player_trend(service.catalog(), player))?;
        }
        Commands::Analyze { position } => match position_analysis(service.catalog(), position) {
            Some(analysis) => print_json(&analysis)?,
            None => anyhow::bail!("No qualifying players at position {}", position),
        },
        Commands::Config => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
