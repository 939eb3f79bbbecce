use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Effective configuration for the recipebox service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeboxConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Listen address
    pub bind: String,
    /// Origins allowed by CORS when not permissive
    pub cors_origins: Vec<String>,
    pub cors_permissive: bool,
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8082".to_string(),
            cors_origins: vec!["http://192.168.56.101".to_string()],
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Server URL; the database path component is replaced by `name`
    pub url: String,
    pub name: String,
    pub table: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432".to_string(),
            name: "recipes".to_string(),
            table: "recipes".to_string(),
            max_connections: 5,
        }
    }
}

impl RecipeboxConfig {
    /// Load config: defaults, then the TOML file, then environment.
    ///
    /// With `path = None` the default location is used and a missing file
    /// means "defaults only". An explicit path must exist. The result is not
    /// validated; call [`Self::validate`] once CLI overrides are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!(
                        "No config file at {}, using defaults",
                        default_path.display()
                    );
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a config file from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get config file path: ~/.recipebox/config.toml
    pub fn config_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from(".recipebox"))
            .join("config.toml")
    }

    /// Overlay values from process environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(name) = lookup("RECIPEBOX_DB_NAME") {
            self.database.name = name;
        }
        if let Some(table) = lookup("RECIPEBOX_DB_TABLE") {
            self.database.table = table;
        }
        if let Some(bind) = lookup("RECIPEBOX_BIND") {
            self.server.bind = bind;
        }
    }

    /// Check values that would otherwise fail late, at bind or provisioning time
    pub fn validate(&self) -> Result<()> {
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::invalid("database.name", "must not be empty"));
        }
        if self.database.table.trim().is_empty() {
            return Err(ConfigError::invalid("database.table", "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections",
                "must be at least 1",
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs",
                "must be at least 1",
            ));
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| ConfigError::invalid("server.bind", format!("{}: {}", self.server.bind, e)))
    }
}

/// .env files touched by [`load_dotenv`]
#[derive(Debug, Default)]
pub struct DotenvFiles {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Load environment variables from .env files.
///
/// Current directory first, then ~/.recipebox/.env. dotenvy never
/// overwrites variables that are already set. This runs before the tracing
/// subscriber exists, so the outcome is returned for the caller to log.
pub fn load_dotenv() -> DotenvFiles {
    let mut files = DotenvFiles::default();
    if let Ok(path) = dotenvy::dotenv() {
        files.loaded.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            load_env_file(&env_file, &mut files);
        }
    }
    files
}

fn load_env_file(path: &Path, files: &mut DotenvFiles) {
    match dotenvy::from_path(path) {
        Ok(()) => files.loaded.push(path.to_path_buf()),
        Err(e) => files.failed.push((path.to_path_buf(), e.to_string())),
    }
}

/// Get the recipebox config directory path (~/.recipebox)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".recipebox"))
}
