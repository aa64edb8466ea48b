use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::*;
use departures_core::logging::init_tracing;
use departures_core::serde_utils::to_pretty_json;
use departures_core::{ReferenceData, ServiceConfig};
use departures_engine::ScheduleStore;
use tracing::debug;

mod client;
mod render;

use client::BoardClient;
use render::{board_rows, print_board};

#[derive(Parser)]
#[command(name = "departures")]
#[command(about = "Departures board - simulated airport flight schedule", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the departures currently shown on the board
    Board(BoardArgs),
    /// Check the board configuration and reference data without serving
    Validate,
    /// Show version information
    Version,
}

#[derive(Args)]
struct BoardArgs {
    /// Base URL of a running departures server
    #[arg(long, env = "DEPARTURES_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server: String,
    /// Generate a schedule in-process from the configured files instead of
    /// querying the server
    #[arg(long, default_value_t = false)]
    local: bool,
    /// Print at most this many rows
    #[arg(short, long)]
    limit: Option<usize>,
    /// Print the flights as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(Some("warn")).context("failed to initialise logging")?;

    match cli.command {
        Commands::Board(args) => board(args).await,
        Commands::Validate => validate(),
        Commands::Version => {
            println!("Departures board v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn board(args: BoardArgs) -> anyhow::Result<()> {
    let (mut flights, reference) = if args.local {
        let store = local_store()?;
        store.regenerate(Utc::now());
        (store.view(), Arc::clone(store.reference()))
    } else {
        let client = BoardClient::new(&args.server)?;
        let flights = client.schedule().await?;
        let airports = client.airports().await?;
        (flights, Arc::new(ReferenceData::new(Vec::new(), airports)))
    };

    debug!(flights = flights.len(), local = args.local, "board loaded");
    if let Some(limit) = args.limit {
        flights.truncate(limit);
    }

    if args.json {
        println!("{}", to_pretty_json(&flights)?);
    } else {
        print_board(&board_rows(&flights, &reference));
    }
    Ok(())
}

fn validate() -> anyhow::Result<()> {
    let store = local_store()?;
    let config = store.config();
    let reference = store.reference();

    println!("{}", "✔ Board configuration is valid".green().bold());
    println!("  Flights per schedule: {}", config.num_flights);
    println!("  Schedule window: {} day(s)", config.schedule_days);
    println!("  Regenerate every: {:?}", config.refresh_interval());
    println!("  Remarks every: {:?}", config.remarks_interval());
    println!("  Airlines: {}", reference.airlines().len());
    println!("  Airports: {}", reference.airports().len());
    Ok(())
}

fn local_store() -> anyhow::Result<ScheduleStore> {
    let config = ServiceConfig::from_env().context("invalid service environment")?;
    ScheduleStore::from_service_config(&config).context("invalid board configuration")
}
