//! Batched insertion of mapped records into a remote table store.
//!
//! [`upload_batch`] writes spot records to the `spots` table and comment
//! records to the `comments` table, in fixed-size batches, through any
//! [`TableStore`]. [`SupabaseStore`] talks to a Supabase project over its
//! PostgREST API. Nothing is rolled back when a batch fails: earlier batches
//! stay inserted and the error names the batch that failed.
#![forbid(unsafe_code)]

mod supabase;

#[doc(hidden)]
pub mod test_support;

use hitchspot_core::{CommentRecord, SpotRecord};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use supabase::{SupabaseCredentials, SupabaseStore};

/// Table receiving spot records.
pub const SPOTS_TABLE: &str = "spots";
/// Table receiving comment records.
pub const COMMENTS_TABLE: &str = "comments";
/// Rows per insert request unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Largest accepted batch; the service rejects bigger requests.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Errors raised while uploading records.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A required credential is absent or blank.
    #[error("missing {name}; set SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY (or SUPABASE_ANON_KEY)")]
    MissingCredentials {
        /// Name of the missing variable.
        name: &'static str,
    },
    /// The project URL does not parse.
    #[error("invalid Supabase URL {url:?}")]
    InvalidUrl {
        /// Rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client or runtime.
    #[error("failed to build upload client: {message}")]
    Client {
        /// Builder error description.
        message: String,
    },
    /// A record could not be serialised.
    #[error("failed to serialise a record for {table}")]
    Serialise {
        /// Destination table.
        table: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The request never reached the service.
    #[error("request to {table} failed: {message}")]
    Request {
        /// Destination table.
        table: String,
        /// Transport error description.
        message: String,
    },
    /// The service refused the rows.
    #[error("{table} rejected the insert with HTTP {status}: {body}")]
    Rejected {
        /// Destination table.
        table: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },
    /// A batch failed after earlier ones succeeded.
    #[error("batch {batch} of {batches} for {table} failed after {inserted} rows were inserted")]
    Partial {
        /// Destination table.
        table: String,
        /// One-based index of the failing batch.
        batch: usize,
        /// Batches planned for the table.
        batches: usize,
        /// Rows inserted before the failure, across both tables.
        inserted: usize,
        /// Failure of the batch.
        #[source]
        source: Box<UploadError>,
    },
}

/// A destination accepting rows of JSON objects per named table.
pub trait TableStore {
    /// Insert `rows` into `table` in one request.
    ///
    /// # Errors
    /// Returns [`UploadError`] when the rows are not accepted.
    fn insert(&self, table: &str, rows: &[Value]) -> Result<(), UploadError>;
}

impl<S: TableStore + ?Sized> TableStore for &S {
    fn insert(&self, table: &str, rows: &[Value]) -> Result<(), UploadError> {
        (**self).insert(table, rows)
    }
}

/// Rows and requests sent by [`upload_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadReport {
    /// Spot records inserted.
    pub spots: usize,
    /// Comment records inserted.
    pub comments: usize,
    /// Insert requests sent.
    pub batches: usize,
}

/// Clamp a requested batch size to `1..=MAX_BATCH_SIZE`.
///
/// # Examples
/// ```
/// use hitchspot_data::upload::clamp_batch_size;
///
/// assert_eq!(clamp_batch_size(0), 1);
/// assert_eq!(clamp_batch_size(250), 250);
/// assert_eq!(clamp_batch_size(5000), 1000);
/// ```
#[must_use]
pub fn clamp_batch_size(requested: usize) -> usize {
    requested.clamp(1, MAX_BATCH_SIZE)
}

/// Upload spots, then comments, in batches of `batch_size` rows.
///
/// Spot records are sent without their import metadata. Comments reference
/// spots by id, so they are only sent once every spot batch succeeded.
///
/// # Errors
/// Returns [`UploadError::Serialise`] before any request when a record
/// fails to serialise, and [`UploadError::Partial`] naming the failing
/// batch otherwise.
pub fn upload_batch(
    store: &dyn TableStore,
    spots: &[SpotRecord],
    comments: &[CommentRecord],
    batch_size: usize,
) -> Result<UploadReport, UploadError> {
    let batch_size = clamp_batch_size(batch_size);
    let spot_rows = to_rows(SPOTS_TABLE, spots)?;
    let comment_rows = to_rows(COMMENTS_TABLE, comments)?;

    let mut report = UploadReport::default();
    let inserted_spots = insert_table(store, SPOTS_TABLE, &spot_rows, batch_size, &mut report)?;
    report.spots = inserted_spots;
    let inserted_comments =
        insert_table(store, COMMENTS_TABLE, &comment_rows, batch_size, &mut report)?;
    report.comments = inserted_comments;
    log::info!(
        "Uploaded {} spots and {} comments in {} requests",
        report.spots,
        report.comments,
        report.batches
    );
    Ok(report)
}

fn to_rows<T: Serialize>(table: &str, records: &[T]) -> Result<Vec<Value>, UploadError> {
    records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|source| UploadError::Serialise {
            table: table.to_owned(),
            source,
        })
}

fn insert_table(
    store: &dyn TableStore,
    table: &str,
    rows: &[Value],
    batch_size: usize,
    report: &mut UploadReport,
) -> Result<usize, UploadError> {
    let batches = rows.len().div_ceil(batch_size);
    let mut inserted = 0;
    for (index, chunk) in rows.chunks(batch_size).enumerate() {
        let batch = index.saturating_add(1);
        store
            .insert(table, chunk)
            .map_err(|source| UploadError::Partial {
                table: table.to_owned(),
                batch,
                batches,
                inserted: report.spots.saturating_add(inserted),
                source: Box::new(source),
            })?;
        inserted = inserted.saturating_add(chunk.len());
        report.batches = report.batches.saturating_add(1);
        log::info!("Uploaded {table} batch {batch}/{batches}");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests;
