//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use hitchspot_cli::CliError;
use tracing_subscriber::EnvFilter;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    init_tracing();
    match hitchspot_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("hitchspot: {err}");
            std::process::exit(1);
        }
    }
}

/// Route `log` records to stderr, filtered by `RUST_LOG` (default `info`).
#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists yet to report the failure"
)]
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("hitchspot: logging disabled: {err}");
    }
}
