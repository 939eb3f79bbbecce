/// Structured error types for recipebox-core.
///
/// The binary wraps these in `anyhow` with context; the library keeps them
/// typed so callers can tell a missing file from a bad value.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config file (invalid TOML): {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },

    /// A value is present but unusable
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
