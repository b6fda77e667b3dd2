//! Error types emitted by the hitchspot CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hitchspot_core::{ClusterParamsError, SelectionError};
use hitchspot_data::{ExportError, GeocoderBuildError, LoadError};
use thiserror::Error;

/// Errors emitted by the hitchspot CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable supplying the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The clustering radius or neighbourhood size is unusable.
    #[error("invalid clustering parameters: {0}")]
    ClusterParams(#[from] ClusterParamsError),
    /// Reading the input table failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The deduplication stages disagreed on batch length.
    #[error("deduplication failed: {0}")]
    Deduplicate(#[from] SelectionError),
    /// Constructing the reverse geocoder failed.
    #[error("failed to build geocoder: {0}")]
    BuildGeocoder(#[from] GeocoderBuildError),
    /// Writing the output file failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Writing the run summary failed.
    #[error("failed to write import summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
