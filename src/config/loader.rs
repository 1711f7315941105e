//! Configuration loader with tier-based merging.
//!
//! Tiers, lowest to highest: embedded defaults, project `kanban/config.yaml`,
//! user `~/.kanban/config.yaml`, an explicit config file, then environment
//! variables. YAML tiers are merged field by field.

use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file.
const CONFIG_PATH_ENV: &str = "KANBAN_CONFIG_PATH";

/// Paths for each configuration tier.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
    /// Explicit config file (`--config` or `KANBAN_CONFIG_PATH`)
    pub explicit_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let user_dir = std::env::var("KANBAN_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".kanban")));

        let project_dir = std::env::var("KANBAN_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("kanban")));

        Self {
            project_dir,
            user_dir,
            explicit_file: std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
            explicit_file: None,
        }
    }

    /// Use `path` as the explicit config file.
    pub fn with_explicit_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }
}

/// Recursively overlay `overlay` onto `base`.
///
/// Objects merge key by key; any other value replaces the base. A null in the
/// overlay means "not specified" and keeps the base.
fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let value = serde_yaml::from_str::<Value>(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(value)
}

/// Read an optional tier file. Missing files are skipped; unreadable ones are
/// logged and skipped.
fn read_tier(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    match read_yaml(path) {
        Ok(value) => {
            debug!(path = %path.display(), "Loaded config tier");
            Some(value)
        }
        Err(e) => {
            warn!("Ignoring config file {}: {:#}", path.display(), e);
            None
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Loaded configuration
    config: Config,
    /// Highest-priority config file that contributed, if any
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration with explicit paths, ignoring the environment.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        Self::load_with(paths, |_| None)
    }

    /// Load configuration with explicit paths and an environment lookup.
    pub fn load_with<E>(paths: ConfigPaths, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut merged = serde_json::to_value(Config::default())?;
        let mut config_path = None;

        for dir in [&paths.project_dir, &paths.user_dir].into_iter().flatten() {
            let file = dir.join("config.yaml");
            if let Some(value) = read_tier(&file) {
                merge_into(&mut merged, value);
                config_path = Some(file);
            }
        }

        // An explicit file was asked for by name, so failing to read it is fatal.
        if let Some(ref file) = paths.explicit_file {
            merge_into(&mut merged, read_yaml(file)?);
            config_path = Some(file.clone());
        }

        let mut config: Config =
            serde_json::from_value(merged).context("invalid configuration")?;
        Self::apply_env_overrides(&mut config, env)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides<E>(config: &mut Config, env: E) -> Result<()>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = env("KANBAN_DB_PATH") {
            config.server.db_path = PathBuf::from(db_path);
        }

        if let Some(static_dir) = env("KANBAN_STATIC_DIR") {
            config.server.static_dir = PathBuf::from(static_dir);
        }

        if let Some(host) = env("HOST") {
            config.server.host = host;
        }

        if let Some(port) = env("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
        }

        Ok(())
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
