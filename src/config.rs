use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings handed to `Database::open`.
///
/// Nothing here is global: logging is only installed when
/// `init_logging` is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub log_level: String,
    /// Try `INSERT INTO t VALUES (...)` before introspecting columns.
    pub fast_path: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            log_level: String::from("warn"),
            fast_path: true,
        }
    }
}

impl Config {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqleasy")
            .join("config.toml")
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load from `default_path()`, or defaults when no file exists there.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;
        Ok(())
    }

    pub fn level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(self.log_level.trim())
            .with_context(|| format!("Unknown log level: {}", self.log_level))
    }

    /// Install a `fmt` subscriber at `log_level`. Fails if a global
    /// subscriber is already set.
    pub fn init_logging(&self) -> Result<()> {
        let level = self.level()?;
        tracing_subscriber::fmt()
            .with_max_level(level)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Failed to install log subscriber")
    }
}
