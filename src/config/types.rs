//! Configuration types and structures.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub board: BoardConfig,
}

/// HTTP server and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `index.html` and the front-end assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Origins allowed to make cross-origin requests.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("kanban.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

/// Board provisioning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Columns created by `reset`, in board order.
    #[serde(default = "default_columns")]
    pub default_columns: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_columns: default_columns(),
        }
    }
}

fn default_columns() -> Vec<String> {
    vec![
        "To Do".to_string(),
        "In Progress".to_string(),
        "Done".to_string(),
    ]
}

impl Config {
    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
