//! Adapters around the hitchspot deduplication core.
//!
//! Responsibilities:
//! - Load raw spot rows from CSV exports and SQLite dumps.
//! - Resolve road names through a Nominatim-compatible HTTP service.
//! - Export mapped records as JSON or GeoJSON.
//! - Upload mapped records to a Supabase table store.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `hitchspot-core`).
//! - Keep blocking I/O off async executors; HTTP adapters own a runtime.
//!
//! Invariants:
//! - No global mutable state; credentials and endpoints are passed in.

mod blocking;
pub mod export;
pub mod geocode;
pub mod load;
pub mod upload;

pub use export::{ExportError, OutputFormat, export_spots, write_geojson, write_spots_json};
pub use geocode::{GeocoderBuildError, NominatimConfig, NominatimGeocoder};
pub use load::{LoadError, SPOT_TABLES, SourceFormat, load_spots};
pub use upload::{
    DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, SupabaseCredentials, SupabaseStore, TableStore,
    UploadError, UploadReport, upload_batch,
};
