//! Layered configuration.
//!
//! Tiers are merged field by field, later tiers winning:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/kanban/config.yaml`
//! 3. **User** - `~/.kanban/config.yaml`
//! 4. **Explicit** - `--config` or `KANBAN_CONFIG_PATH`
//! 5. **Environment** - see below
//!
//! ## Environment Variables
//! - `KANBAN_CONFIG_PATH` - Explicit config file
//! - `KANBAN_DB_PATH` - Database path
//! - `KANBAN_STATIC_DIR` - Front-end directory
//! - `HOST`, `PORT` - Bind address
//! - `KANBAN_USER_DIR` - User config dir (default: `~/.kanban`)
//! - `KANBAN_PROJECT_DIR` - Project config dir (default: `./kanban`)

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigPaths};
pub use types::*;
