//! # Logging Facility
//!
//! `LoggingFacility` owns the lifecycle of the application's log output. It is
//! constructed explicitly from a [`LoggingConfig`], started with `setup()` and
//! torn down with `shutdown()`; nothing is installed behind the caller's back.
//!
//! ## Setup
//!
//! `setup()` assembles a `tracing` subscriber from three pieces:
//!
//! 1.  **Environment Filter (`EnvFilter`)**: `RUST_LOG` wins when it is set,
//!     otherwise the configured level directive is used.
//!
//! 2.  **File Logging**: a daily rolling appender in `logs_dir` named
//!     `<prefix>.<YYYY-MM-DD>.log`, written through `tracing_appender`'s
//!     non-blocking worker. ANSI colors are disabled. When a retention period
//!     is configured the appender also caps the number of files it keeps, and
//!     a sweep removes prefixed files older than the period before the first
//!     file is opened.
//!
//! 3.  **Stderr Mirror (Opt-in)**: with `console = true` every event is also
//!     written to stderr with ANSI colors.
//!
//! Every line is stamped by [`ZonedTimer`] in the configured timezone.
//!
//! ## Lifecycle
//!
//! `Idle` → `Active` → `ShutDown`. Setting up an active facility is a no-op,
//! and a shut-down facility cannot be started again. `shutdown()` is safe in
//! every state and flushes buffered lines to disk by dropping the writer
//! guard. Dropping an active facility shuts it down.

use crate::config::{DispatchScope, LoggingConfig};
use crate::error::{LoggingError, Result};
use crate::retention::{self, LOG_FILE_SUFFIX};
use crate::timestamp::ZonedTimer;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::io::stderr;
use std::path::PathBuf;
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt::layer, prelude::*};

/// Observable lifecycle state of a [`LoggingFacility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityState {
    Idle,
    Active,
    ShutDown,
}

enum Lifecycle {
    Idle,
    Active(ActiveLogging),
    ShutDown,
}

/// Resources held while the facility is active. Field order matters: the
/// dispatcher is uninstalled before the writer guard flushes.
struct ActiveLogging {
    _dispatch: Option<DefaultGuard>,
    _writer: WorkerGuard,
}

pub struct LoggingFacility {
    config: LoggingConfig,
    zone: Tz,
    lifecycle: Lifecycle,
}

impl std::fmt::Debug for LoggingFacility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingFacility")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl LoggingFacility {
    /// Creates an idle facility with default level, prefix and scope.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidTimezone`] if `timezone` is not an IANA
    /// identifier, or [`LoggingError::InvalidPrefix`] for an unusable file
    /// prefix.
    pub fn new(
        timezone: impl Into<String>,
        logs_dir: impl Into<PathBuf>,
        retention_days: u32,
    ) -> Result<Self> {
        Self::from_config(LoggingConfig::new(timezone, logs_dir, retention_days))
    }

    pub fn from_config(config: LoggingConfig) -> Result<Self> {
        let zone = config.zone()?;
        config.validate_prefix()?;
        Ok(Self {
            config,
            zone,
            lifecycle: Lifecycle::Idle,
        })
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.zone
    }

    /// Current wall-clock time in the configured timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.zone)
    }

    pub fn state(&self) -> FacilityState {
        match self.lifecycle {
            Lifecycle::Idle => FacilityState::Idle,
            Lifecycle::Active(_) => FacilityState::Active,
            Lifecycle::ShutDown => FacilityState::ShutDown,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == FacilityState::Active
    }

    /// Starts file logging.
    ///
    /// On failure the facility stays `Idle` and `shutdown()` remains safe.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory or the first log file cannot be
    /// created, the level filter does not parse, a global subscriber is
    /// already installed (for [`DispatchScope::Global`]), or the facility was
    /// already shut down.
    pub fn setup(&mut self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Active(_) => return Ok(()),
            Lifecycle::ShutDown => return Err(LoggingError::AlreadyShutDown),
            Lifecycle::Idle => {}
        }

        let logs_dir = &self.config.logs_dir;
        std::fs::create_dir_all(logs_dir).map_err(|source| LoggingError::CreateLogDir {
            path: logs_dir.clone(),
            source,
        })?;

        // Sweep before the appender opens today's file.
        let swept = retention::sweep(
            logs_dir,
            &self.config.file_prefix,
            self.config.retention_days,
        )?;

        let env_filter = self.env_filter()?;
        let file_appender = self.file_appender()?;
        let (non_blocking, writer_guard) = tracing_appender::non_blocking(file_appender);

        let timer = ZonedTimer::new(self.zone);
        let file_layer = layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_timer(timer);
        let console_layer = self.config.console.then(|| {
            layer()
                .with_writer(stderr)
                .with_ansi(true)
                .with_timer(timer)
        });

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer);

        let dispatch = match self.config.scope {
            DispatchScope::Thread => Some(subscriber.set_default()),
            DispatchScope::Global => {
                subscriber
                    .try_init()
                    .map_err(|_| LoggingError::SubscriberAlreadySet)?;
                None
            }
        };

        self.lifecycle = Lifecycle::Active(ActiveLogging {
            _dispatch: dispatch,
            _writer: writer_guard,
        });

        tracing::info!(
            timezone = %self.config.timezone,
            logs_dir = %self.config.logs_dir.display(),
            retention_days = self.config.retention_days,
            "Logging started"
        );
        if !swept.removed.is_empty() || swept.failed > 0 {
            tracing::info!(
                removed = swept.removed.len(),
                failed = swept.failed,
                "Expired log files swept"
            );
        }
        Ok(())
    }

    /// Stops logging and flushes buffered lines. Safe to call in any state.
    pub fn shutdown(&mut self) {
        if let Lifecycle::Active(_) = self.lifecycle {
            tracing::info!("Logging shut down");
        }
        // Dropping `ActiveLogging` uninstalls the dispatcher, then joins the
        // writer worker.
        self.lifecycle = Lifecycle::ShutDown;
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        build_filter(from_env.as_deref(), &self.config.level)
    }

    fn file_appender(&self) -> Result<RollingFileAppender> {
        let mut builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(&self.config.file_prefix)
            .filename_suffix(LOG_FILE_SUFFIX);
        if self.config.retention_days > 0 {
            builder = builder.max_log_files(self.config.retention_days as usize);
        }
        builder
            .build(&self.config.logs_dir)
            .map_err(|source| LoggingError::Appender {
                path: self.config.logs_dir.clone(),
                source,
            })
    }
}

/// `RUST_LOG` when set and non-empty, else the configured level. A malformed
/// directive is an error in either case.
fn build_filter(from_env: Option<&str>, level: &str) -> Result<EnvFilter> {
    let directives = from_env
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(level);
    EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

impl Drop for LoggingFacility {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_rejects_unknown_timezone() {
        let err = LoggingFacility::new("Nowhere/Special", "logs", 30).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidTimezone { .. }));
    }

    #[test]
    fn test_new_starts_idle() {
        let facility = LoggingFacility::new("Asia/Kolkata", "logs", 30).unwrap();
        assert_eq!(facility.state(), FacilityState::Idle);
        assert_eq!(facility.timezone(), chrono_tz::Asia::Kolkata);
        assert_eq!(facility.config().retention_days, 30);
    }

    #[test]
    fn test_shutdown_before_setup_is_safe() {
        let mut facility = LoggingFacility::new("UTC", "logs", 30).unwrap();
        facility.shutdown();
        facility.shutdown();
        assert_eq!(facility.state(), FacilityState::ShutDown);
    }

    #[test]
    fn test_setup_after_shutdown_is_rejected() {
        let dir = tempdir().unwrap();
        let mut facility = LoggingFacility::new("UTC", dir.path().join("logs"), 30).unwrap();
        facility.shutdown();
        assert!(matches!(facility.setup(), Err(LoggingError::AlreadyShutDown)));
    }

    #[test]
    fn test_setup_twice_is_noop() {
        let dir = tempdir().unwrap();
        let mut facility = LoggingFacility::new("UTC", dir.path().join("logs"), 30).unwrap();
        facility.setup().unwrap();
        facility.setup().unwrap();
        assert!(facility.is_active());
        facility.shutdown();
        assert_eq!(facility.state(), FacilityState::ShutDown);
    }

    #[test]
    fn test_failed_setup_leaves_facility_idle() {
        let dir = tempdir().unwrap();
        // A file where the directory should be.
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut facility = LoggingFacility::new("UTC", &blocker, 30).unwrap();
        assert!(matches!(facility.setup(), Err(LoggingError::CreateLogDir { .. })));
        assert_eq!(facility.state(), FacilityState::Idle);

        facility.shutdown();
        assert_eq!(facility.state(), FacilityState::ShutDown);
    }

    #[test]
    fn test_new_rejects_empty_prefix() {
        let config = LoggingConfig::new("UTC", "logs", 30).with_file_prefix("");
        assert!(matches!(
            LoggingFacility::from_config(config),
            Err(LoggingError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn test_build_filter_uses_level_when_env_unset_or_blank() {
        assert!(build_filter(None, "debug").is_ok());
        assert!(build_filter(Some("  "), "debug").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_malformed_env_value() {
        match build_filter(Some("logkeeper=loud"), "info") {
            Err(LoggingError::InvalidFilter { filter, .. }) => {
                assert_eq!(filter, "logkeeper=loud")
            }
            other => panic!("expected InvalidFilter, got {other:?}"),
        }
    }

    #[test]
    fn test_build_filter_prefers_env_and_rejects_malformed_level() {
        assert!(build_filter(Some("warn"), "info").is_ok());
        assert!(matches!(
            build_filter(None, "logkeeper=loud"),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_now_is_in_configured_zone() {
        let facility = LoggingFacility::new("Asia/Kolkata", "logs", 30).unwrap();
        assert_eq!(facility.now().timezone(), chrono_tz::Asia::Kolkata);
    }
}
