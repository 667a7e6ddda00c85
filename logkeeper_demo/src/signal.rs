//! Interrupt handling and classification of a run's outcome.
//!
//! SIGINT and SIGTERM only set a flag. The flag is consulted after the
//! demonstration routine returns and takes precedence over whatever the
//! routine produced, so an interrupted run is always reported as
//! interrupted, even when the routine also failed.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status for a run stopped by SIGINT/SIGTERM (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a process-wide SIGINT/SIGTERM handler that raises this flag.
    ///
    /// # Errors
    ///
    /// Fails if a handler was already installed in this process.
    pub fn install(&self) -> Result<()> {
        let raised = Arc::clone(&self.raised);
        ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst))
            .context("Failed to install interrupt handler")
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    Failed(anyhow::Error),
    Interrupted,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Completed | Outcome::Failed(_) => 0,
            Outcome::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }
}

/// Interrupt first, then the routine's own result.
pub fn classify<T>(interrupted: bool, result: Result<T>) -> Outcome {
    if interrupted {
        return Outcome::Interrupted;
    }
    match result {
        Ok(_) => Outcome::Completed,
        Err(err) => Outcome::Failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_takes_precedence_over_failure() {
        let outcome = classify::<()>(true, Err(anyhow::anyhow!("division by zero")));
        assert!(matches!(outcome, Outcome::Interrupted));
        assert_eq!(outcome.exit_code(), INTERRUPTED_EXIT_CODE);
    }

    #[test]
    fn test_interrupt_takes_precedence_over_success() {
        assert!(matches!(classify(true, Ok(1)), Outcome::Interrupted));
    }

    #[test]
    fn test_failure_without_interrupt_is_contained() {
        let outcome = classify::<()>(false, Err(anyhow::anyhow!("boom")));
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_success_without_interrupt() {
        let outcome = classify(false, Ok(5));
        assert!(matches!(outcome, Outcome::Completed));
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_flag_is_shared_between_clones() {
        let flag = InterruptFlag::new();
        let handler_side = flag.clone();
        assert!(!flag.is_raised());
        handler_side.raise();
        assert!(flag.is_raised());
    }
}
