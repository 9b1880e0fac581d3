use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DormError, Result};

/// Load environment variables from .env files.
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the environment
/// 2. Current directory .env
/// 3. ~/.dormctl/.env
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path.display().to_string());
    }

    if let Some(env_file) = config_dir().map(|d| d.join(".env")) {
        if env_file.exists() {
            // dotenvy never overwrites variables that are already set
            match dotenvy::from_path(&env_file) {
                Ok(()) => loaded_from.push(env_file.display().to_string()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.dormctl)");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }
}

/// Get the dormctl config directory path (~/.dormctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dormctl"))
}

// ============================================================================
// TOML Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DormctlConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub reports: ReportsConfig,
}

/// Connection parameters for the relational store. Passed as-is to the driver.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_database")]
    pub name: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            name: default_database(),
            user: default_user(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_rooms_path")]
    pub rooms: PathBuf,

    #[serde(default = "default_students_path")]
    pub students: PathBuf,

    /// Directory the report files are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms_path(),
            students: default_students_path(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Baseline used instead of "today" when computing ages
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_rooms_path() -> PathBuf {
    PathBuf::from("rooms.json")
}

fn default_students_path() -> PathBuf {
    PathBuf::from("students.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The fixed "now" the age reports have always been computed against.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 21).unwrap_or_default()
}

impl DormctlConfig {
    /// Load config from TOML files and the environment.
    ///
    /// Priority order (highest to lowest):
    /// 1. DB_HOST / DB_PORT / DB_NAME / DB_USER / DB_PASSWORD
    /// 2. `explicit` path if given, otherwise ./dormctl.toml (merged key by key)
    /// 3. ~/.dormctl/config.toml
    /// 4. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let global_path = config_dir().map(|d| d.join("config.toml"));
        let mut config = match explicit {
            Some(path) => Self::load_layers(global_path.as_deref(), path, true)?,
            None => Self::load_layers(global_path.as_deref(), Path::new("dormctl.toml"), false)?,
        };

        config.database.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Merge `local` over `global` key by key, then fill the rest from defaults.
    ///
    /// With `required`, a missing or unparseable `local` file is an error;
    /// otherwise bad files are logged and skipped.
    pub fn load_layers(global: Option<&Path>, local: &Path, required: bool) -> Result<Self> {
        let mut merged = toml::Table::new();

        if let Some(global) = global {
            if let Some(table) = skip_on_error(global, read_table(global)) {
                merge_tables(&mut merged, table);
            }
        }

        if required {
            merge_tables(&mut merged, read_table(local)?);
        } else if let Some(table) = skip_on_error(local, read_table(local)) {
            merge_tables(&mut merged, table);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e| DormError::config(format!("invalid configuration: {}", e)))
    }
}

/// Right overrides left; nested tables are merged rather than replaced.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let incoming = match value {
            toml::Value::Table(incoming) => incoming,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let contents = std::fs::read_to_string(path).map_err(|e| DormError::io(path, e))?;
    let table = contents.parse::<toml::Table>().map_err(|e| {
        DormError::config(format!("failed to parse {}: {}", path.display(), e))
    })?;
    debug!("Loaded config from {}", path.display());
    Ok(table)
}

fn skip_on_error(path: &Path, result: Result<toml::Table>) -> Option<toml::Table> {
    match result {
        Ok(table) => Some(table),
        Err(DormError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

impl DatabaseConfig {
    /// Overlay connection settings from environment-style variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| DormError::config(format!("DB_PORT must be a port number, got '{}'", port)))?;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.name = name;
        }
        if let Some(user) = lookup("DB_USER") {
            self.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.password = password;
        }
        Ok(())
    }
}
