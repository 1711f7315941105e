//! CLI command definitions for kanban-board
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod show;

use clap::{Args, Parser, Subcommand};
use show::ShowArgs;

/// Kanban board server and maintenance tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve(ServeArgs),

    /// Delete all tasks and re-create the configured columns
    Reset(ResetArgs),

    /// Verify that every column's task positions are dense
    Check,

    /// Print the board
    Show(ShowArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory with the front-end files (overrides config)
    #[arg(long)]
    pub static_dir: Option<String>,
}

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset even if the board has tasks
    #[arg(short, long)]
    pub force: bool,

    /// Column names to create instead of the configured defaults
    #[arg(long = "column", value_name = "NAME")]
    pub columns: Vec<String>,
}
