//! Facade crate for the hitchspot deduplication engine.
//!
//! This crate re-exports the core domain types and the named scoring
//! strategies, and exposes the loader, geocoder, export and upload adapters
//! behind the `adapters` feature.

#![forbid(unsafe_code)]

pub use hitchspot_core::{
    Appreciation, ClusterLabel, ClusterParams, ClusterParamsError, Clustering, CommentRecord,
    DedupConfig, DedupOutcome, DedupSummary, Direction, EnrichConfig, EnrichReport, FilterConfig,
    FilterReport, GeocodeError, MappedBatch, MapperConfig, Representative, ReverseGeocoder,
    Scorer, ScoringContext, SelectionError, Spot, SpotRecord, SpotRow, cluster_spots,
    compute_direction, deduplicate, enrich_road_names, filter_rows, haversine_km,
    map_representatives, score_spots, select_representatives,
};

pub use hitchspot_scorer::{CompositeScorer, ScorerError, ScoringStrategy, SubScoreWeights};

#[cfg(feature = "adapters")]
pub use hitchspot_data::{
    ExportError, LoadError, NominatimGeocoder, OutputFormat, SupabaseCredentials, SupabaseStore,
    TableStore, UploadError, UploadReport, export_spots, load_spots, upload_batch,
};
