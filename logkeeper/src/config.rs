//! # Logging Configuration
//!
//! `LoggingConfig` holds everything the facility needs to start: the IANA
//! timezone used for timestamps, the directory that receives the rolling log
//! files, and how many days of files to keep. The remaining knobs (level
//! filter, file prefix, console mirroring, dispatch scope) have defaults, so a
//! config is usually built with [`LoggingConfig::new`] and a few `with_*`
//! setters, or loaded from a JSON file with [`LoggingConfig::load_from_file`].
//!
//! The timezone is kept as a string so the config round-trips through JSON
//! unchanged; it is parsed by [`LoggingConfig::zone`] when the facility is
//! constructed.

use crate::error::{LoggingError, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_RETENTION_DAYS: u32 = 30;
pub const DEFAULT_LEVEL: &str = "info";
pub const DEFAULT_FILE_PREFIX: &str = "app";

/// Where the subscriber built by `setup()` is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchScope {
    /// Only events emitted on the thread that called `setup()` are captured.
    /// Uninstalled again by `shutdown()`.
    #[default]
    Thread,
    /// Installed as the process-wide default. Can only happen once per process.
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// IANA timezone identifier, e.g. `Asia/Kolkata`.
    pub timezone: String,
    pub logs_dir: PathBuf,
    /// Days of log files to keep. `0` keeps everything.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Mirror log events to stderr in addition to the log files.
    #[serde(default)]
    pub console: bool,
    #[serde(default)]
    pub scope: DispatchScope,
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

impl LoggingConfig {
    pub fn new(
        timezone: impl Into<String>,
        logs_dir: impl Into<PathBuf>,
        retention_days: u32,
    ) -> Self {
        Self {
            timezone: timezone.into(),
            logs_dir: logs_dir.into(),
            retention_days,
            level: default_level(),
            file_prefix: default_file_prefix(),
            console: false,
            scope: DispatchScope::default(),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_scope(mut self, scope: DispatchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Parses the configured timezone identifier.
    pub fn zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| LoggingError::InvalidTimezone {
                name: self.timezone.clone(),
                reason: e.to_string(),
            })
    }

    /// Checks the file prefix used for daily log names and by the retention
    /// sweep.
    pub fn validate_prefix(&self) -> Result<()> {
        let prefix = &self.file_prefix;
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(LoggingError::InvalidPrefix {
                prefix: prefix.clone(),
            });
        }
        Ok(())
    }

    /// Reads a JSON config file. Unknown fields are rejected.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| LoggingError::ReadConfig {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| LoggingError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}
