mod api;
mod cli;
mod error;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::models::AnalysisFocus;

#[derive(Parser)]
#[command(name = "betlens")]
#[command(about = "An AI-assisted football match analysis and betting suggestion service")]
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
    /// List this week's fixtures grouped by day
    Matches,
    /// Run a full AI analysis for one match in the terminal
    Analyze {
        /// Home team name
        #[arg(long)]
        home: String,
        /// Away team name
        #[arg(long)]
        away: String,
        /// Analysis focus: standard, defensive, offensive or upset
        #[arg(long, default_value = "standard")]
        focus: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting Betlens API server on port {}", port);
            api::serve(port).await?;
        }
        Some(Commands::Matches) => {
            tracing::info!("Listing weekly fixtures");
            cli::show_matches().await?;
        }
        Some(Commands::Analyze { home, away, focus }) => {
            let focus: AnalysisFocus = focus.parse()?;
            tracing::info!("Analyzing {} vs {}", home, away);
            cli::analyze_match(&home, &away, focus).await?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting Betlens API server on port 3000");
            api::serve(3000).await?;
        }
    }

    Ok(())
}
