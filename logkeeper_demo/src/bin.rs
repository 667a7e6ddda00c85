// Binary entry point for logkeeper_demo
// This is a thin wrapper that delegates to the library implementation

use std::process::ExitCode;

fn main() -> ExitCode {
    match logkeeper_demo::run() {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("logkeeper_demo fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
