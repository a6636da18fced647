mod api;
mod cli;
mod config;
mod models;
mod services;
mod store;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "leaguedash")]
#[command(about = "Cross-league fantasy football standings and playoff seeding")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Show standings for each league
    Standings,
    /// Show the cross-league playoff picture
    Playoffs {
        /// List every team instead of stopping at the bubble
        #[arg(short, long)]
        all: bool,
    },
    /// Show the top score of every week
    HighScores,
    /// Show every league's matchups for a week
    Matchups {
        #[arg(short, long)]
        week: Option<u32>,
    },
    /// List all teams
    Teams,
    /// Show a team's roster and results
    Team {
        #[arg(short, long)]
        name: String,
    },
    /// Manage playoff bracket matchups
    Bracket {
        #[command(subcommand)]
        action: BracketAction,
    },
    /// Export the playoff table to CSV
    Export {
        #[arg(short, long, default_value = "playoffs.csv")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum BracketAction {
    /// List weeks, or one week's matchups with live scores
    List {
        #[arg(short, long)]
        week: Option<u32>,
    },
    /// Add a matchup; teams are "Name" or "League:Name"
    Add {
        #[arg(long)]
        team1: String,
        #[arg(long)]
        team2: String,
        #[arg(short, long)]
        week: u32,
    },
    /// Remove a matchup by id
    Remove {
        #[arg(short, long)]
        week: u32,
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting LeagueDash API server on port {}", port);
            api::serve(config, port).await?;
        }
        Some(Commands::Standings) => {
            tracing::info!("Showing standings");
            cli::show_standings(&config).await?;
        }
        Some(Commands::Playoffs { all }) => {
            tracing::info!("Showing playoff picture");
            cli::show_playoffs(&config, all).await?;
        }
        Some(Commands::HighScores) => {
            tracing::info!("Showing weekly high scores");
            cli::show_high_scores(&config).await?;
        }
        Some(Commands::Matchups { week }) => {
            tracing::info!("Showing matchups");
            cli::show_matchups(&config, week).await?;
        }
        Some(Commands::Teams) => {
            tracing::info!("Listing teams");
            cli::show_teams(&config).await?;
        }
        Some(Commands::Team { name }) => {
            tracing::info!("Querying team: {}", name);
            cli::query_team(&config, &name).await?;
        }
        Some(Commands::Bracket { action }) => match action {
            BracketAction::List { week } => cli::list_bracket(&config, week).await?,
            BracketAction::Add { team1, team2, week } => {
                tracing::info!("Adding week {} matchup: {} vs {}", week, team1, team2);
                cli::add_matchup(&config, &team1, &team2, week).await?;
            }
            BracketAction::Remove { week, id } => {
                tracing::info!("Removing week {} matchup {}", week, id);
                cli::remove_matchup(&config, week, &id).await?;
            }
        },
        Some(Commands::Export { output }) => {
            tracing::info!("Exporting playoff table to {}", output.display());
            cli::export_playoffs(&config, &output).await?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting LeagueDash API server on port 3000");
            api::serve(config, 3000).await?;
        }
    }

    Ok(())
}
