//! Configuration Management
//!
//! This module resolves the database connection the tracker should open.
//!
//! # Configuration Sources
//! - Environment: `DB_ENGINE`, `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
//!   `DB_NAME`, `DB_FILE` (a `.env` file in the working directory is loaded
//!   first)
//! - Local: `.employee-tracker/config.json` (per-project)
//! - Global: `~/.config/employee-tracker/config.json` (per-user)
//!
//! # Resolution Precedence
//! 1. Named connection requested on the command line
//! 2. Environment variables
//! 3. Default connection of the config file (local before global)
//!
//! # Config File Format
//! ```json
//! {
//!   "connections": {
//!     "local": { "engine": "postgres", "host": "localhost", "port": 5432,
//!                "user": "postgres", "password_env": "PGPASSWORD",
//!                "database": "employees_db" },
//!     "scratch": { "engine": "sqlite", "file": "employees.db" }
//!   },
//!   "default": "local"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{ConnectionConfig, DatabaseType};
use crate::error::{Result, TrackerError};

/// Directory (local) and application name (global) used for config files
const APP_DIR: &str = "employee-tracker";

/// Default `PostgreSQL` host when `DB_HOST` is unset
pub const DEFAULT_HOST: &str = "localhost";

/// Default `PostgreSQL` port when `DB_PORT` is unset
pub const DEFAULT_PORT: u16 = 5432;

/// Contents of a config file: named connections and a default pointer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionFile {
    /// Named connections
    #[serde(default)]
    pub connections: HashMap<String, StoredConnection>,

    /// Name of the default connection (must exist in connections map)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Stored connection configuration
///
/// Similar to `ConnectionConfig` but supports an environment variable
/// reference for the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConnection {
    /// Connection configuration
    #[serde(flatten)]
    pub config: ConnectionConfig,

    /// Environment variable name for password (if not storing password directly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl StoredConnection {
    /// Resolve the password reference and return a `ConnectionConfig`
    pub fn resolve(&self, env: &impl Fn(&str) -> Option<String>) -> Result<ConnectionConfig> {
        let mut config = self.config.clone();

        if let Some(env_var) = &self.password_env {
            let password = env(env_var).ok_or_else(|| {
                TrackerError::config_error(format!(
                    "Environment variable {env_var} not found for password"
                ))
            })?;
            config.password = Some(password);
        }

        Ok(config)
    }
}

impl ConnectionFile {
    /// Pick a connection by name, or the default when `name` is `None`
    pub fn select(&self, name: Option<&str>) -> Result<&StoredConnection> {
        let conn_name = match name {
            Some(n) => n,
            None => self.default.as_deref().ok_or_else(|| {
                TrackerError::config_error(format!(
                    "No default connection set. Available connections: {:?}",
                    self.sorted_names()
                ))
            })?,
        };

        self.connections.get(conn_name).ok_or_else(|| {
            TrackerError::config_error(format!(
                "Connection '{conn_name}' not found. Available connections: {:?}",
                self.sorted_names()
            ))
        })
    }

    fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.connections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Get path to local config file (`.employee-tracker/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        TrackerError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(format!(".{APP_DIR}")).join("config.json"))
}

/// Get path to global config file (`~/.config/employee-tracker/config.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| TrackerError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join(APP_DIR).join("config.json"))
}

/// Load a config file; a missing file yields `None`
pub fn load_connection_file(path: &Path) -> Result<Option<ConnectionFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| TrackerError::config_error(format!("Could not read config file: {e}")))?;

    serde_json::from_str(&contents).map(Some).map_err(|e| {
        TrackerError::config_error(format!(
            "Invalid config file format in {}: {e}",
            path.display()
        ))
    })
}

/// First existing config file, local before global
pub fn load_with_precedence() -> Result<Option<ConnectionFile>> {
    if let Some(file) = load_connection_file(&local_config_path()?)? {
        return Ok(Some(file));
    }

    // No home directory is not an error when the local file is absent
    match global_config_path() {
        Ok(path) => load_connection_file(&path),
        Err(_) => Ok(None),
    }
}

/// Build a connection from `DB_*` variables, if they name a database
///
/// Returns `Ok(None)` when neither `DB_NAME` nor `DB_FILE` is set.
pub fn from_env(env: &impl Fn(&str) -> Option<String>) -> Result<Option<ConnectionConfig>> {
    let engine = match env("DB_ENGINE") {
        Some(name) => DatabaseType::parse(&name).ok_or_else(|| {
            TrackerError::config_error(format!(
                "Unsupported DB_ENGINE '{name}' (expected 'postgres' or 'sqlite')"
            ))
        })?,
        None if env("DB_FILE").is_some() && env("DB_NAME").is_none() => DatabaseType::SQLite,
        None => DatabaseType::Postgres,
    };

    match engine {
        DatabaseType::SQLite => {
            Ok(env("DB_FILE").map(|file| ConnectionConfig::sqlite(file.into())))
        }
        DatabaseType::Postgres => {
            let Some(database) = env("DB_NAME") else {
                return Ok(None);
            };

            let port = match env("DB_PORT") {
                Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                    TrackerError::config_error(format!("Invalid DB_PORT '{raw}': {e}"))
                })?,
                None => DEFAULT_PORT,
            };

            let user = env("DB_USER").ok_or_else(|| {
                TrackerError::config_error("DB_USER must be set when DB_NAME is set")
            })?;

            Ok(Some(ConnectionConfig {
                engine: DatabaseType::Postgres,
                host: Some(env("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string())),
                port: Some(port),
                user: Some(user),
                password: env("DB_PASSWORD"),
                database: Some(database),
                file: None,
            }))
        }
    }
}

/// Resolve the connection to open from the given sources
///
/// `file` is the already-loaded config file (if any) and `env` looks up
/// environment variables; see the module docs for precedence.
pub fn resolve_from(
    name: Option<&str>,
    file: Option<&ConnectionFile>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<ConnectionConfig> {
    if let Some(name) = name {
        let file = file.ok_or_else(|| {
            TrackerError::config_error(format!(
                "Connection '{name}' requested but no config file was found"
            ))
        })?;
        return file.select(Some(name))?.resolve(env);
    }

    if let Some(config) = from_env(env)? {
        return Ok(config);
    }

    match file {
        Some(file) => file.select(None)?.resolve(env),
        None => Err(TrackerError::config_error(
            "No database configured. Set DB_NAME, DB_USER and DB_PASSWORD (PostgreSQL) \
             or DB_FILE (SQLite), or create .employee-tracker/config.json",
        )),
    }
}

/// Resolve the connection from `.env`, the process environment, and config files
pub fn resolve_connection(name: Option<&str>) -> Result<ConnectionConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => {
            return Err(TrackerError::config_error(format!("Could not load .env file: {e}")));
        }
    }

    let file = load_with_precedence()?;
    resolve_from(name, file.as_ref(), &|key: &str| std::env::var(key).ok())
}
