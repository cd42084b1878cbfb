//! Scrapeflow - Supervisor Entry Point
//!
//! Two public subcommands (`producer`, `consumer`) start the supervising
//! process; the hidden `worker` subcommand is what spawned child processes
//! boot into.

mod supervise;
mod worker;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrapeflow_core::domain::Role;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "scrapeflow")]
#[command(about = "Adaptive process-pool scrape pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as producer
    Producer {
        /// Number of worker processes to spawn
        #[arg(short = 'w', long = "worker", default_value_t = 1)]
        workers: usize,
    },

    /// Run as consumer
    Consumer {
        /// Number of worker processes to spawn
        #[arg(short = 'w', long = "worker", default_value_t = 1)]
        workers: usize,
    },

    /// Worker process entry point (spawned by the supervisor)
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        role: String,
    },
}

fn init_logging() {
    let log_format =
        std::env::var("SCRAPEFLOW_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("scrapeflow=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // An invalid or missing subcommand exits 1; help/version keep clap's
    // usual stdout handling
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Invalid command. Use \"producer\" or \"consumer\".");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Producer { workers } => supervise::run(Role::Producer, workers).await,
        Commands::Consumer { workers } => supervise::run(Role::Consumer, workers).await,
        Commands::Worker { role } => match Role::from_str(&role) {
            Ok(role) => worker::run(role).await,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}
