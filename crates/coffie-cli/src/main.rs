//! Command-line entry point for Coffie.
//!
//! `coffie serve` runs the session API over the configured `SQLite`
//! database. `init-db`, `deinit-db`, and `reinit-db` manage the schema
//! without starting the server.
//!
//! # Startup Sequence (`serve`)
//!
//! 1. Load configuration from `coffie.yaml` (if present) plus environment
//! 2. Initialize structured logging (tracing)
//! 3. Open the database and apply pending migrations
//! 4. Build the application state (lottery, roster page)
//! 5. Serve until `Ctrl-C` / `SIGTERM`, then close the pool

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coffie_core::config::LogFormat;
use coffie_core::{CoffieConfig, Lottery};
use coffie_db::{SqliteConfig, SqliteDb};
use coffie_server::{AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "coffie",
    about = "Coffie: pick who fetches the coffee",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "COFFIE_CONFIG", default_value = "coffie.yaml", global = true)]
    config: PathBuf,

    /// Database file (overrides the configuration)
    #[arg(short, long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema if needed and serve the session API
    Serve {
        /// Address to bind to (overrides the configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the actors and events tables
    InitDb,

    /// Drop the actors and events tables
    DeinitDb,

    /// Drop and recreate the tables, discarding all data
    ReinitDb,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, database setup, or the server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CoffieConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(path) = cli.database.clone() {
        config.database.path = path;
    }

    init_logging(&config);
    info!(config = %cli.config.display(), database = config.database.path, "coffie starting");

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(&config).await.context("serving session API")?;
        }
        Commands::InitDb => {
            let db = open_database(&config).await?;
            db.init_schema().await.context("initializing schema")?;
            db.close().await;
        }
        Commands::DeinitDb => {
            let db = open_database(&config).await?;
            db.drop_schema().await.context("dropping schema")?;
            db.close().await;
        }
        Commands::ReinitDb => {
            let db = open_database(&config).await?;
            db.reset_schema().await.context("resetting schema")?;
            db.close().await;
        }
    }

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &CoffieConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Open the configured database file.
async fn open_database(config: &CoffieConfig) -> Result<SqliteDb, CliError> {
    let db_config =
        SqliteConfig::new(&config.database.path).with_max_connections(config.database.max_connections);
    Ok(SqliteDb::connect(&db_config).await?)
}

/// Run the session server until shutdown.
async fn serve(config: &CoffieConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    db.init_schema().await?;

    let lottery = Lottery::new(config.selection.trials)?;
    info!(trials = lottery.trials(), "Lottery configured");

    let state = AppState::new(db.clone())?
        .with_lottery(lottery)
        .with_public_url(config.server.public_url.clone());

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let result = coffie_server::start_server(&server_config, Arc::new(state)).await;

    db.close().await;
    result.map_err(CliError::from)
}
