//! price-scout - Multi-retailer price comparison CLI
//!
//! A Rust implementation with TLS fingerprint emulation for reliable scraping.

use anyhow::Result;
use clap::{Parser, Subcommand};
use price_scout::commands::{QueryCommand, RetailersCommand};
use price_scout::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "price-scout",
    version,
    about = "Multi-retailer price comparison CLI",
    long_about = "Queries configured retailers in parallel, falling back through each retailer's adapter chain until a price resolves."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Overall deadline per query in milliseconds
    #[arg(long, global = true, env = "PRICE_SCOUT_DEADLINE_MS")]
    deadline_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query prices across all configured retailers
    #[command(alias = "q")]
    Query {
        /// Product to search for
        query: String,
    },

    /// List configured retailers and their adapter chains
    Retailers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(deadline) = cli.deadline_ms {
        config.deadline_ms = deadline;
    }

    match cli.command {
        Commands::Query { query } => {
            let cmd = QueryCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Retailers => {
            let cmd = RetailersCommand::new(config);
            println!("{}", cmd.execute()?);
        }
    }

    Ok(())
}
