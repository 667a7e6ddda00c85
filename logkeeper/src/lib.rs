//! # logkeeper
//!
//! Timezone-aware, retention-bounded file logging on top of `tracing`.
//!
//! ```no_run
//! use logkeeper::LoggingFacility;
//!
//! let mut logging = LoggingFacility::new("Asia/Kolkata", "logs", 30)?;
//! logging.setup()?;
//! tracing::info!("hello from the log file");
//! logging.shutdown();
//! # Ok::<(), logkeeper::LoggingError>(())
//! ```

pub mod config;
pub mod error;
pub mod facility;
pub mod retention;
pub mod timestamp;

pub use config::{DispatchScope, LoggingConfig};
pub use error::{LoggingError, Result};
pub use facility::{FacilityState, LoggingFacility};
pub use retention::{RetentionReport, sweep};
pub use timestamp::ZonedTimer;
