//! The demonstration routine and how its failure is reported.
use std::backtrace::{Backtrace, BacktraceStatus};
use std::io::Write;

/// Alias so `thiserror` does not treat these fields as `#[backtrace]`
/// (which requires the nightly `error_generic_member_access` feature).
type CapturedBacktrace = Backtrace;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("attempted to divide {dividend} by zero")]
    DivisionByZero { dividend: i64, backtrace: CapturedBacktrace },

    #[error("{dividend} / {divisor} overflows i64")]
    Overflow {
        dividend: i64,
        divisor: i64,
        backtrace: CapturedBacktrace,
    },

    #[error("failed to write greeting")]
    Output(#[from] std::io::Error),
}

impl DemoError {
    /// Short, stable name of the error kind, printed at the top of the report.
    pub fn kind(&self) -> &'static str {
        match self {
            DemoError::DivisionByZero { .. } => "DivisionByZero",
            DemoError::Overflow { .. } => "Overflow",
            DemoError::Output(_) => "Output",
        }
    }

    /// Call sequence recorded where the arithmetic error was raised.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            DemoError::DivisionByZero { backtrace, .. } | DemoError::Overflow { backtrace, .. } => {
                Some(backtrace)
            }
            DemoError::Output(_) => None,
        }
    }
}

pub fn divide(dividend: i64, divisor: i64) -> Result<i64, DemoError> {
    if divisor == 0 {
        return Err(DemoError::DivisionByZero {
            dividend,
            backtrace: Backtrace::force_capture(),
        });
    }
    dividend
        .checked_div(divisor)
        .ok_or_else(|| DemoError::Overflow {
            dividend,
            divisor,
            backtrace: Backtrace::force_capture(),
        })
}

/// Prints the greeting, then fails on `1 / 0`.
pub fn my_app(out: &mut impl Write) -> Result<i64, DemoError> {
    writeln!(out, "Hello World!")?;
    out.flush()?;
    tracing::debug!("Greeting written, dividing");
    divide(1, 0)
}

/// Renders an error trace: the kind, the message chain, and the call
/// sequence. Arithmetic errors always carry one; other errors show anyhow's
/// backtrace when `RUST_BACKTRACE=1` captured it.
pub fn render_report(error: &anyhow::Error) -> String {
    let demo_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DemoError>());
    let kind = demo_error.map_or("Error", DemoError::kind);

    let mut report = format!("{kind}: {error}\n");
    for (depth, cause) in error.chain().skip(1).enumerate() {
        if depth == 0 {
            report.push_str("\nCaused by:\n");
        }
        report.push_str(&format!("    {depth}: {cause}\n"));
    }

    let captured = |bt: &&Backtrace| bt.status() == BacktraceStatus::Captured;
    let backtrace = demo_error
        .and_then(DemoError::backtrace)
        .filter(captured)
        .or_else(|| Some(error.backtrace()).filter(captured));
    if let Some(backtrace) = backtrace {
        report.push_str(&format!("\nStack backtrace:\n{backtrace}\n"));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_divide_ok() {
        assert_eq!(divide(10, 2).unwrap(), 5);
        assert_eq!(divide(-9, 3).unwrap(), -3);
    }

    #[test]
    fn test_divide_by_zero() {
        match divide(1, 0) {
            Err(DemoError::DivisionByZero { dividend, .. }) => assert_eq!(dividend, 1),
            other => panic!("expected DivisionByZero, got {other:?}"),
        }
    }

    #[test]
    fn test_divide_overflow_is_not_reported_as_zero() {
        let err = divide(i64::MIN, -1).unwrap_err();
        assert_eq!(err.kind(), "Overflow");
    }

    #[test]
    fn test_my_app_greets_before_failing() {
        let mut out = Vec::new();
        let result = my_app(&mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "Hello World!\n");
        assert!(matches!(result, Err(DemoError::DivisionByZero { dividend: 1, .. })));
    }

    #[test]
    fn test_render_report_names_kind_and_chain() {
        let err = divide(1, 0)
            .context("demonstration routine failed")
            .unwrap_err();
        let report = render_report(&err);

        assert!(report.starts_with("DivisionByZero: demonstration routine failed\n"));
        assert!(report.contains("Caused by:"));
        assert!(report.contains("0: attempted to divide 1 by zero"));
    }

    #[test]
    fn test_division_error_always_records_call_sequence() {
        let err = divide(1, 0).unwrap_err();
        let backtrace = err.backtrace().expect("arithmetic error without backtrace");
        assert_eq!(backtrace.status(), BacktraceStatus::Captured);

        let report = render_report(&anyhow::Error::from(err));
        assert!(report.contains("\nStack backtrace:\n"), "{report}");
    }

    #[test]
    fn test_render_report_for_foreign_error() {
        let err = anyhow::anyhow!("plain failure");
        let report = render_report(&err);
        assert!(report.starts_with("Error: plain failure\n"));
        assert!(!report.contains("Caused by:"));
    }
}
