//! The main entry point for the `recolor` command-line application.
//!
//! Parses arguments, sets up the diagnostic stream and hands off to
//! [`recolor::commands::execute`].

use recolor::cli;
use recolor::commands;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    // --verbose enables DEBUG, otherwise use RUST_LOG or default to WARN
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = commands::execute(args, io::stdout().lock(), io::stderr());
    if let Err(e) = &result {
        eprintln!("Error: {e}");
    }
    process::exit(commands::exit_code(&result));
}
