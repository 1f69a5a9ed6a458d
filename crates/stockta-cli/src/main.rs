//! stockta command-line interface
//!
//! Reads OHLCV bars from CSV and writes indicator results as CSV or JSON.
//! Results go to stdout or the `-o` file; logs go to stderr.

use std::io::IsTerminal;
use std::process::ExitCode;

use stockta_cli::args::Args;
use stockta_cli::commands;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match commands::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
