//! # uuidy CLI
//!
//! The `uuidy` binary classifies 128-bit identifiers, with a focus on
//! Bluetooth Low Energy service UUIDs, and serves the same pipeline over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! uuidy --config ./config/uuidy.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `uuidy init` | Create the SQLite database and run schema migrations |
//! | `uuidy classify <uuid>` | Classify an identifier (cache first, then web search) |
//! | `uuidy get <uuid>` | Print a stored classification without searching |
//! | `uuidy known` | List the built-in assigned GATT services |
//! | `uuidy serve` | Start the HTTP API server |
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`).
//! Command output goes to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use uuidy::{classify, config, get, known, migrate, server};

#[derive(Parser)]
#[command(
    name = "uuidy",
    about = "uuidy: identify unknown UUIDs, with a focus on Bluetooth Low Energy",
    version,
    long_about = "uuidy normalizes a UUID, checks a local SQLite cache, and on a miss \
    searches the web and classifies the identifier with a rule-based engine \
    (standard GATT service, vendor-specific, iBeacon, Eddystone, custom, unknown)."
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "./config/uuidy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database (create tables and indexes).
    Init,

    /// Classify a UUID, using the cache when possible.
    Classify {
        /// Hyphenated or bare 32-digit UUID.
        uuid: String,
    },

    /// Show a stored classification without searching.
    Get {
        uuid: String,
    },

    /// List the built-in assigned GATT services.
    Known,

    /// Start the HTTP API server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let load = || config::load_config(&cli.config);

    match cli.command {
        Commands::Init => {
            let cfg = load()?;
            migrate::run_migrations(&cfg).await?;
            println!(
                "Database initialized successfully (cache TTL {} days).",
                cfg.cache.ttl_days
            );
        }
        Commands::Classify { uuid } => {
            classify::run_classify(&load()?, &uuid).await?;
        }
        Commands::Get { uuid } => {
            get::run_get(&load()?, &uuid).await?;
        }
        // Needs no config
        Commands::Known => known::run_known(),
        Commands::Serve => {
            server::run_server(&load()?).await?;
        }
    }

    Ok(())
}
