//! Kanban Board Server
//!
//! Serves a single Kanban board over HTTP, backed by SQLite, and provides
//! maintenance subcommands for resetting and checking the board.

use anyhow::Result;
use clap::Parser;
use kanban_board::cli::{Cli, Command, ResetArgs, ServeArgs};
use kanban_board::config::{Config, ConfigLoader, ConfigPaths};
use kanban_board::db::Database;
use kanban_board::format::{format_board, format_stats, format_violations};
use kanban_board::web;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug over info.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn init_logging(cli: &Cli) -> Result<()> {
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli.verbose))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli.verbose))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli.verbose))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut paths = ConfigPaths::discover();
    if let Some(ref path) = cli.config {
        paths = paths.with_explicit_file(path);
    }
    let loader = ConfigLoader::load_with(paths, |key| std::env::var(key).ok())?;
    if let Some(path) = loader.config_path() {
        info!(path = %path.display(), "Using config file");
    }

    let mut config = loader.into_config();
    if let Some(ref db_path) = cli.database {
        config.server.db_path = PathBuf::from(db_path);
    }
    Ok(config)
}

fn open_database(config: &Config) -> Result<Database> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;
    info!(path = %config.server.db_path.display(), "Opened board database");
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = load_config(&cli)?;

    match cli.command {
        None => run_serve(&mut config, ServeArgs::default()).await,
        Some(Command::Serve(args)) => run_serve(&mut config, args).await,
        Some(Command::Reset(args)) => run_reset(&config, args),
        Some(Command::Check) => run_check(&config),
        Some(Command::Show(args)) => {
            let db = open_database(&config)?;
            let board = db.get_board()?;
            print!("{}", format_board(&board, args.format)?);
            Ok(())
        }
    }
}

/// Run the HTTP server until Ctrl-C.
async fn run_serve(config: &mut Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(static_dir) = args.static_dir {
        config.server.static_dir = PathBuf::from(static_dir);
    }
    if !config.server.static_dir.join("index.html").exists() {
        warn!(
            "No index.html in {}; only the API will be useful",
            config.server.static_dir.display()
        );
    }

    let db = Arc::new(open_database(config)?);
    let handle = web::start_server(db, &config.server).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    handle.shutdown().await;

    Ok(())
}

/// Run the reset command
fn run_reset(config: &Config, args: ResetArgs) -> Result<()> {
    let db = open_database(config)?;

    let existing = db.board_stats()?;
    if existing.tasks > 0 && !args.force {
        anyhow::bail!(
            "Board has {} task(s). Use --force to delete them.",
            existing.tasks
        );
    }

    let columns = if args.columns.is_empty() {
        &config.board.default_columns
    } else {
        &args.columns
    };
    let stats = db.reset_board(columns.as_slice())?;

    println!("Board reset");
    print!("{}", format_stats(&stats));
    Ok(())
}

/// Run the check command
fn run_check(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let violations = db.density_violations()?;

    if violations.is_empty() {
        println!("OK: every column is densely ordered");
        return Ok(());
    }

    print!("{}", format_violations(&violations));
    anyhow::bail!("{} column(s) have gaps or duplicate positions", violations.len())
}
