//! Spond availability collector
//!
//! Gathers match availability from Spond and publishes it as an xlsx workbook or a
//! formatted Google Sheet.

mod commands;
mod config;
mod db;
mod errors;
mod export;
mod filters;
mod ingest;
mod models;
mod ordering;
mod source;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{DumpSpondsArgs, ProcessDirectoryArgs, UpdateGoogleSheetArgs};
use config::Config;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "spond-availability")]
#[command(about = "Collect Spond match availability into spreadsheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Update a Google Sheet with availability information
    UpdateGoogleSheet(UpdateGoogleSheetArgs),
    /// Process individual Sponds from JSON files in <DIRECTORY> into an Excel workbook
    ProcessDirectory(ProcessDirectoryArgs),
    /// Fetch every Spond for <GROUP> and write each one to a JSON file in <DIRECTORY>
    DumpSponds(DumpSpondsArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_tracing(&config);

    match cli.command {
        Command::UpdateGoogleSheet(args) => {
            let summary = commands::publish_google_sheet(&args, &config).await?;
            if !summary.failed.is_empty() {
                tracing::warn!("Teams not published: {}", summary.failed.join(", "));
            }
        }
        Command::ProcessDirectory(args) => {
            let summary = commands::process_directory(&args)?;
            if !summary.failed.is_empty() {
                tracing::warn!("Teams not written: {}", summary.failed.join(", "));
            }
        }
        Command::DumpSponds(args) => {
            commands::dump_sponds(&args, &config).await?;
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
