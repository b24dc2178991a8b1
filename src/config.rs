//! Configuration loaded from `promptbook.toml`
//!
//! ```toml
//! [store]
//! dir = "prompts"
//! builtin = true
//!
//! [logging]
//! level = "warn"
//! format = "pretty"
//! ```
//!
//! Environment variables override the file: `PROMPTBOOK_TEMPLATES`,
//! `PROMPTBOOK_LOG_LEVEL` and `PROMPTBOOK_LOG_FORMAT`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const CONFIG_FILE: &str = "promptbook.toml";

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Where templates come from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory of extra `*.md` templates, layered over the builtins
    pub dir: Option<PathBuf>,
    /// Include the templates embedded in the binary
    pub builtin: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            builtin: true,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template directory
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Include or exclude the builtin templates
    pub fn with_builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `warn` or `promptbook=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(other.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from an explicit path, or the first standard location that exists,
    /// then apply environment overrides
    ///
    /// An explicit path must exist; missing standard locations fall back to
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let found = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_file(),
        };

        let mut config = match found {
            Some(p) => {
                debug!(path = %p.display(), "loading configuration");
                Self::from_file(&p)?
            }
            None => Self::default(),
        };

        config.merge_env()?;
        Ok(config)
    }

    /// `./promptbook.toml`, then `<config dir>/promptbook/config.toml`
    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("promptbook").join("config.toml"))
            .filter(|p| p.exists())
    }

    /// Merge process environment variables into the configuration
    pub fn merge_env(&mut self) -> Result<(), ConfigError> {
        self.merge_env_from(|var| std::env::var(var).ok())
    }

    /// Merge overrides from an environment lookup
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("PROMPTBOOK_TEMPLATES").filter(|d| !d.is_empty()) {
            self.store.dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = lookup("PROMPTBOOK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PROMPTBOOK_LOG_FORMAT") {
            self.logging.format = format.parse().map_err(|value| ConfigError::InvalidEnv {
                var: "PROMPTBOOK_LOG_FORMAT".to_string(),
                value,
            })?;
        }
        Ok(())
    }
}
