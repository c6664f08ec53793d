use crate::core::db::schema::{DEFAULT_SCHEMA, DEFAULT_TABLESPACE};
use crate::core::{PgTablesError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub connection: Option<ConnectionConfig>,
    pub defaults: Option<DefaultsConfig>,
}

/// How the command-line tool reaches the server.
#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    /// libpq-style key/value string or `postgresql://` URL
    pub url: String,
}

/// Defaults applied to bare table names.
#[derive(Debug, Deserialize)]
pub struct DefaultsConfig {
    pub schema: Option<String>,
    pub tablespace: Option<String>,
}

impl Config {
    pub fn url(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.url.as_str())
    }

    pub fn schema(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.schema.as_deref())
            .unwrap_or(DEFAULT_SCHEMA)
    }

    pub fn tablespace(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.tablespace.as_deref())
            .unwrap_or(DEFAULT_TABLESPACE)
    }
}

/// `<config dir>/pgtables/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pgtables").join("config.toml"))
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = pgtables::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| PgTablesError::Config(e.to_string()))
}
