//! Core domain types and algorithms for the hitchspot engine.
//!
//! The crate turns a noisy table of hitchhiking spot reports into one
//! representative per physical location:
//!
//! 1. [`filter_rows`] validates coordinates and applies the configured
//!    predicates.
//! 2. [`cluster_spots`] groups nearby spots with density-based clustering
//!    over the haversine metric.
//! 3. A [`Scorer`] rates every spot and [`select_representatives`] keeps the
//!    best one per cluster while passing noise points through.
//! 4. [`map_representatives`] produces the output records and
//!    [`enrich_road_names`] optionally fills in road names.
//!
//! [`deduplicate`] runs steps 1–3 in one call. Nothing in this crate
//! performs I/O besides the [`ReverseGeocoder`] a caller supplies.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod appreciation;
pub mod cluster;
pub mod direction;
pub mod distance;
pub mod filter;
pub mod geocode;
pub mod mapper;
pub mod pipeline;
pub mod score;
pub mod select;
pub mod spot;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod timestamp;

pub use appreciation::Appreciation;
pub use cluster::{ClusterLabel, ClusterParams, ClusterParamsError, Clustering, cluster_spots};
pub use direction::{Direction, compute_direction};
pub use distance::{EARTH_RADIUS_KM, central_angle, haversine_km, km_to_radians};
pub use filter::{FilterConfig, FilterReport, filter_rows};
pub use geocode::{
    EnrichConfig, EnrichReport, GeocodeError, RateLimiter, ReverseGeocoder, UNKNOWN_ROAD,
    enrich_road_names,
};
pub use mapper::{
    CommentRecord, IMPORT_AUTHOR, MappedBatch, MapperConfig, PLACEHOLDER_ROAD_NAME, SpotMetadata,
    SpotRecord, destination_descriptor, map_representatives,
};
pub use pipeline::{DedupConfig, DedupOutcome, DedupSummary, deduplicate};
pub use score::{DEFAULT_RATING_CEILING, Scorer, ScoringContext, SubScore, score_spots};
pub use select::{Representative, SelectionError, select_representatives};
pub use spot::{LATITUDE_RANGE, LONGITUDE_RANGE, Spot, SpotRow, is_valid_coordinate};
pub use timestamp::{parse_timestamp, start_of_day};
