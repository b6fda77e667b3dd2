//! Command-line interface for importing hitchhiking spots.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod import;

pub use error::CliError;
use import::{ImportArgs, run_import};

pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_GEOJSON: &str = "geojson";
pub(crate) const ARG_UPLOAD: &str = "upload";
pub(crate) const ARG_DRY_RUN: &str = "dry-run";
pub(crate) const ARG_GEOCODE: &str = "geocode";
pub(crate) const ARG_COUNTRY: &str = "country";
pub(crate) const ARG_MIN_DATE: &str = "min-date";
pub(crate) const ARG_EPSILON_KM: &str = "epsilon-km";
pub(crate) const ARG_MIN_SAMPLES: &str = "min-samples";
pub(crate) const ARG_STRATEGY: &str = "strategy";
pub(crate) const ARG_MIN_RATING: &str = "min-rating";
pub(crate) const ARG_MAX_SPOTS: &str = "max-spots";
pub(crate) const ARG_BATCH_SIZE: &str = "batch-size";
pub(crate) const ARG_GEOCODE_DELAY_MS: &str = "geocode-delay-ms";
pub(crate) const ARG_INCLUDE_BANNED: &str = "include-banned";
pub(crate) const ARG_ONLY_REVIEWED: &str = "only-reviewed";
pub(crate) const ARG_ALLOW_MISSING_DESTINATION: &str = "allow-missing-destination";
pub(crate) const ENV_INPUT: &str = "HITCHSPOT_CMDS_IMPORT_INPUT";

/// Run the hitchspot CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// input cannot be read, or an output cannot be written. Upload failures are
/// reported without failing the run.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => run_import(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hitchspot",
    about = "Deduplicate hitchhiking spot reports into representative locations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load, cluster and score spots, then export or upload the survivors.
    Import(ImportArgs),
}

#[cfg(test)]
mod tests;
