use crate::error::{LoggingError, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Extension of the files written by the daily appender.
pub const LOG_FILE_SUFFIX: &str = "log";

/// Date part of a daily file name, `<prefix>.<YYYY-MM-DD>.log`.
const LOG_DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of one retention sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RetentionReport {
    pub removed: Vec<PathBuf>,
    pub failed: usize,
}

/// Deletes daily log files in `dir` named `<prefix>.<YYYY-MM-DD>.log` whose
/// modification time is older than `retention_days`. Any other file is left
/// alone.
///
/// `retention_days == 0` or an empty `prefix` disables the sweep. A missing
/// directory is treated as empty. Files that cannot be removed are logged
/// and counted in [`RetentionReport::failed`].
pub fn sweep(dir: &Path, prefix: &str, retention_days: u32) -> Result<RetentionReport> {
    sweep_at(dir, prefix, retention_days, SystemTime::now())
}

pub(crate) fn sweep_at(
    dir: &Path,
    prefix: &str,
    retention_days: u32,
    now: SystemTime,
) -> Result<RetentionReport> {
    let mut report = RetentionReport::default();
    if retention_days == 0 || prefix.is_empty() || !dir.exists() {
        return Ok(report);
    }

    let window = Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY);
    let cutoff = now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);

    let scan_err = |source| LoggingError::Retention {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let path = entry.path();
        if !path.is_file() || !is_log_name(&path, prefix) {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(err) => {
                tracing::warn!("Skipping {} during retention: {}", path.display(), err);
                continue;
            }
        };
        if modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed expired log {}", path.display());
                report.removed.push(path);
            }
            Err(err) => {
                tracing::warn!("Failed to remove old log {}: {}", path.display(), err);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

fn is_log_name(path: &Path, prefix: &str) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(LOG_FILE_SUFFIX))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|date| NaiveDate::parse_from_str(date, LOG_DATE_FORMAT).is_ok())
}
