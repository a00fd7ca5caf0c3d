use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;

use buzz::cli::Cli;
use buzz::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to a file; the guard flushes them on exit.
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{} logging disabled: {}", "warning:".yellow(), e);
            None
        }
    };

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
