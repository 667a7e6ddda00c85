//! # logkeeper_demo
//!
//! Entry program that drives a [`logkeeper::LoggingFacility`] around a
//! routine that always fails, and guarantees the facility is shut down.
//!
//! - **`cli`**: argument parsing and the setup → run → report → shutdown flow
//! - **`demo`**: the failing routine and the error trace it produces
//! - **`signal`**: SIGINT/SIGTERM flag and outcome precedence

pub mod cli;
pub mod demo;
pub mod signal;

pub use cli::{Cli, run, run_with};
pub use demo::{DemoError, divide, my_app, render_report};
pub use signal::{InterruptFlag, Outcome, classify};
