//! Application configuration.
//!
//! The configuration is loaded from
//! `$XDG_CONFIG_HOME/aerospace-scratchpad/config.json`.  Every section is
//! optional; a missing file or a minimal `{}` file gives the compiled-in
//! defaults.  A few environment variables take precedence over the file:
//!
//! | variable                          | overrides          |
//! |-----------------------------------|--------------------|
//! | `AEROSPACESOCK`                   | `ipc.socket_path`  |
//! | `AEROSPACE_SCRATCHPAD_LOGS_PATH`  | `logging.path`     |
//! | `AEROSPACE_SCRATCHPAD_LOGS_LEVEL` | `logging.level`    |
//!
//! # Example
//!
//! ```json
//! {
//!   "ipc": { "timeout_ms": 2000 },
//!   "sticky": { "poll_interval_ms": 250 },
//!   "logging": { "path": "/tmp/scratchpad.log", "level": "DEBUG" }
//! }
//! ```

use crate::aerospace::SOCKET_ENV;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LOGS_PATH_ENV: &str = "AEROSPACE_SCRATCHPAD_LOGS_PATH";
pub const LOGS_LEVEL_ENV: &str = "AEROSPACE_SCRATCHPAD_LOGS_LEVEL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ipc: IpcConfig,

    #[serde(default)]
    pub sticky: StickyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection to the AeroSpace server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Socket path.  `None` means `/tmp/bobko.aerospace-$USER.sock`.
    pub socket_path: Option<PathBuf>,
    /// Read/write timeout per request (ms).  `0` disables the timeout.
    pub timeout_ms: u64,
    /// Binary used for `--geometry`.  `None` means `window-manager` next to
    /// this executable.
    pub resize_helper: Option<PathBuf>,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            timeout_ms: 5000,
            resize_helper: None,
        }
    }
}

/// Sticky window tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickyConfig {
    pub poll_interval_ms: u64,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl StickyConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Log sink.  Logging is off unless a level is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub path: PathBuf,
    /// `DEBUG`, `INFO`, `WARN` or `ERROR` (case-insensitive).
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/tmp/aerospace-scratchpad.log"),
            level: None,
        }
    }
}

impl LoggingConfig {
    /// The configured level, or `Off` when logging is disabled.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        let Some(level) = self.level.as_deref() else {
            return Ok(LevelFilter::Off);
        };
        match level.trim().to_ascii_uppercase().as_str() {
            "" | "DISABLED" | "OFF" => Ok(LevelFilter::Off),
            "DEBUG" => Ok(LevelFilter::Debug),
            "INFO" => Ok(LevelFilter::Info),
            "WARN" | "WARNING" => Ok(LevelFilter::Warn),
            "ERROR" => Ok(LevelFilter::Error),
            _ => Err(ConfigError(format!("unknown log level {:?}", level))),
        }
    }
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/aerospace-scratchpad`).
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("aerospace-scratchpad")
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load `config.json` from [`config_dir`] if present, then apply the
    /// environment.
    ///
    /// Runs before logging is set up, so problems are returned rather than
    /// logged.
    pub fn from_environment() -> (Self, Option<ConfigError>) {
        let path = config_dir().join("config.json");
        let (mut config, problem) = if path.exists() {
            match Self::load(&path) {
                Ok(cfg) => (cfg, None),
                Err(e) => (Self::default(), Some(e)),
            }
        } else {
            (Self::default(), None)
        };
        config.apply_env(|key| std::env::var(key).ok());
        (config, problem)
    }

    /// Override fields from environment variables looked up through `var`.
    /// Empty values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.is_empty());
        if let Some(sock) = var(SOCKET_ENV) {
            self.ipc.socket_path = Some(PathBuf::from(sock));
        }
        if let Some(path) = var(LOGS_PATH_ENV) {
            self.logging.path = PathBuf::from(path);
        }
        if let Some(level) = var(LOGS_LEVEL_ENV) {
            self.logging.level = Some(level);
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("config error: {0}")]
pub struct ConfigError(String);
