//! Load raw spot rows from a CSV export or an SQLite dump.
//!
//! The format follows the file extension: `.csv` for comma-separated text,
//! `.sqlite` or `.db` for an SQLite database holding a `points` (or `point`)
//! table. Columns are matched by name, so extra columns are ignored and
//! either the descriptive or the legacy short names may be used.
#![forbid(unsafe_code)]

mod columns;
mod delimited;
mod sqlite;

use camino::{Utf8Path, Utf8PathBuf};
use hitchspot_core::SpotRow;
use thiserror::Error;

/// Tables searched in an SQLite dump, in priority order.
pub const SPOT_TABLES: [&str; 2] = ["points", "point"];

/// Errors raised while loading spot rows.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The extension names no supported format.
    #[error("unsupported input format for {path}; expected .csv, .sqlite or .db")]
    UnsupportedFormat {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The database holds neither spot table.
    #[error("no `points` or `point` table in {path}; found {found:?}")]
    MissingTable {
        /// Database path.
        path: Utf8PathBuf,
        /// Tables that do exist.
        found: Vec<String>,
    },
    /// Opening the input failed.
    #[error("failed to open {path}")]
    Open {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Database {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Reading rows from the database failed.
    #[error("failed to query {table} in {path}")]
    Query {
        /// Database path.
        path: Utf8PathBuf,
        /// Table being read.
        table: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The CSV file could not be decoded.
    #[error("failed to read CSV from {path}")]
    Csv {
        /// Input path.
        path: Utf8PathBuf,
        /// Source error returned by `csv`.
        #[source]
        source: csv::Error,
    },
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// SQLite database.
    Sqlite,
}

impl SourceFormat {
    /// Pick the format from the file extension, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use hitchspot_data::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::detect(Utf8Path::new("dump.DB")), Some(SourceFormat::Sqlite));
    /// assert_eq!(SourceFormat::detect(Utf8Path::new("points.csv")), Some(SourceFormat::Csv));
    /// assert_eq!(SourceFormat::detect(Utf8Path::new("points.json")), None);
    /// ```
    #[must_use]
    pub fn detect(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "sqlite" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Load every row from `path`.
///
/// # Errors
/// Returns [`LoadError`] when the format is unsupported, the file cannot be
/// read, or an SQLite dump lacks a spot table.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use hitchspot_data::load_spots;
///
/// # fn main() -> Result<(), hitchspot_data::LoadError> {
/// let rows = load_spots(Utf8Path::new("data/points.csv"))?;
/// println!("{} rows", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn load_spots(path: &Utf8Path) -> Result<Vec<SpotRow>, LoadError> {
    let format = SourceFormat::detect(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let rows = match format {
        SourceFormat::Csv => delimited::read_csv(path)?,
        SourceFormat::Sqlite => sqlite::read_sqlite(path)?,
    };
    log::info!(
        "Loaded {} raw points from {}",
        rows.len(),
        path.file_name().unwrap_or(path.as_str())
    );
    Ok(rows)
}
