use std::path::PathBuf;

/// Errors raised while configuring, starting or sweeping the logging facility.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Unknown timezone '{name}': {reason}")]
    InvalidTimezone { name: String, reason: String },

    #[error("Invalid log file prefix '{prefix}': must be non-empty and contain no path separators")]
    InvalidPrefix { prefix: String },

    #[error("Failed to create log directory '{path:?}'")]
    CreateLogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open rolling log file in '{path:?}'")]
    Appender {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("Invalid log level filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("A global tracing subscriber is already installed")]
    SubscriberAlreadySet,

    #[error("Logging facility has already been shut down")]
    AlreadyShutDown,

    #[error("Failed to read logging config '{path:?}'")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse logging config '{path:?}'")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to scan log directory '{path:?}' for retention")]
    Retention {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LoggingError>;
