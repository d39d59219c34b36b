//! Employee Tracker CLI Entry Point
//!
//! Resolves the database connection, opens it once, and runs the interactive
//! menu until the user picks "Quit". With no arguments the tool goes straight
//! to the menu.
//!
//! Menu output goes to stdout. Logs go to stderr (`RUST_LOG` or `--debug`).

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use employee_tracker::config;
use employee_tracker::engine::{DatabaseType, Store};
use employee_tracker::menu::run_session;
use employee_tracker::prompt::TerminalPrompter;

#[cfg(feature = "postgres")]
use employee_tracker::engine::postgres::PostgresStore;
#[cfg(feature = "sqlite")]
use employee_tracker::engine::sqlite::SqliteStore;

/// Employee Tracker - manage employees, roles, and departments
#[derive(Parser)]
#[command(name = "employee-tracker")]
#[command(about = "Interactive manager for employee, role, and department records")]
#[command(version)]
struct Cli {
    /// Named connection from the config file (overrides DB_* variables)
    #[arg(long, value_name = "NAME")]
    connection: Option<String>,

    /// Create the department, role, and employee tables if they are missing
    #[arg(long)]
    init_schema: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Console logging; `RUST_LOG` wins over the `--debug` default
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep going either way
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .compact()
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::resolve_connection(cli.connection.as_deref())
        .context("Could not resolve the database connection")?;
    tracing::info!(database = %config.describe(), "Connecting to the database");

    match config.engine {
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => {
            let store = PostgresStore::connect(&config)
                .await
                .context("Error connecting to the database")?;
            tracing::debug!(version = store.server_version(), "Connected to PostgreSQL");
            session(store, cli.init_schema).await
        }
        #[cfg(feature = "sqlite")]
        DatabaseType::SQLite => {
            let store = SqliteStore::open(&config).context("Error connecting to the database")?;
            session(store, cli.init_schema).await
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("The {other} engine is not enabled in this build"),
    }
}

/// Run the menu against an open store; the store is closed on every path
async fn session<S: Store>(store: S, init_schema: bool) -> Result<()> {
    println!("Connected to the database.");

    let mut prompter = TerminalPrompter::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_session(store, init_schema, &mut prompter, &mut out)
        .await
        .context("Session ended with an error")
}
