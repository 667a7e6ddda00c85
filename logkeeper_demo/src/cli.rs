//! # logkeeper_demo CLI
//!
//! Command-line definition and the entry flow: set up logging, run the
//! demonstration routine, report how it ended, and always shut logging down.

use crate::demo::{my_app, render_report};
use crate::signal::{InterruptFlag, Outcome, classify};
use anyhow::{Context, Result};
use clap::Parser;
use logkeeper::config::{DEFAULT_LEVEL, DEFAULT_RETENTION_DAYS};
use logkeeper::{LoggingConfig, LoggingFacility};
use std::io::{self, Write};
use std::path::PathBuf;

pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Runs a routine that always fails, with timezone-aware file logging around it.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about,
    long_about = "logkeeper_demo starts file logging, runs a routine that prints a greeting and \
then divides by zero, prints the resulting error trace to stderr, and shuts logging down.

With no arguments logs go to ./logs, stamped in Asia/Kolkata time, kept for 30 days.
   Example: logkeeper_demo --timezone Europe/Berlin --logs-dir /tmp/demo-logs"
)]
pub struct Cli {
    /// IANA timezone used for log timestamps
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Directory that receives the daily log files
    #[arg(long, default_value = DEFAULT_LOGS_DIR)]
    pub logs_dir: PathBuf,

    /// Days of log files to keep (0 keeps everything)
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u32,

    /// Log level filter, used when RUST_LOG is not set
    #[arg(long, default_value = DEFAULT_LEVEL)]
    pub log_level: String,

    /// Also write log events to stderr
    #[arg(long)]
    pub console_log: bool,

    /// Load the logging configuration from a JSON file instead of the flags above
    #[arg(long, conflicts_with_all = ["timezone", "logs_dir", "retention_days", "log_level"])]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn logging_config(&self) -> Result<LoggingConfig> {
        let config = match &self.config {
            Some(path) => LoggingConfig::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => LoggingConfig::new(&self.timezone, &self.logs_dir, self.retention_days)
                .with_level(&self.log_level),
        };
        let console = config.console || self.console_log;
        Ok(config.with_console(console))
    }
}

/// Parses the command line, installs the interrupt handler and runs.
pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    let interrupt = InterruptFlag::new();
    if let Err(e) = interrupt.install() {
        eprintln!("Warning: {e:#}");
    }
    run_with(&cli, &interrupt, &mut io::stdout(), &mut io::stderr())
}

/// The entry flow with explicit output streams and interrupt flag.
///
/// Only configuration errors are returned; the routine's own failure is
/// reported on `err` and comes back as [`Outcome::Failed`].
pub fn run_with(
    cli: &Cli,
    interrupt: &InterruptFlag,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<Outcome> {
    let config = cli.logging_config()?;
    let mut logging =
        LoggingFacility::from_config(config).context("Invalid logging configuration")?;

    if let Err(e) = logging.setup() {
        writeln!(
            err,
            "Logging setup failed, continuing without log files: {:#}",
            anyhow::Error::from(e)
        )?;
    }

    let result = my_app(out).context("Demonstration routine failed");
    let outcome = classify(interrupt.is_raised(), result);

    match &outcome {
        Outcome::Completed => tracing::info!("Demonstration routine completed"),
        Outcome::Failed(error) => {
            tracing::error!("Demonstration routine failed: {error:#}");
            write!(err, "{}", render_report(error))?;
            err.flush()?;
        }
        Outcome::Interrupted => {
            tracing::warn!("Interrupted, shutting down");
            writeln!(out, "Shutting down...")?;
        }
    }

    // Dropping `logging` on an early return above shuts it down as well.
    writeln!(out, "Shutting down logger...")?;
    logging.shutdown();
    Ok(outcome)
}
