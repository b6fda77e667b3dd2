//! Map representatives onto the spot and comment output schema.
//!
//! Records carry a fresh UUID, the original coordinates, a compass
//! direction towards the destination and placeholder road names that the
//! enrichment stage may later replace. Debugging metadata rides along in
//! [`SpotMetadata`] and is never serialised with the record.

use chrono::{DateTime, Utc};
use geo::Coord;
#[cfg(feature = "serde")]
use serde::Serialize;
use uuid::Uuid;

use crate::timestamp::parse_timestamp;
use crate::{Appreciation, ClusterLabel, Direction, Representative, compute_direction};

/// Road name written before any geocoding.
pub const PLACEHOLDER_ROAD_NAME: &str = "Imported spot";
/// Author recorded on imported spots and anonymous comments.
pub const IMPORT_AUTHOR: &str = "import";

/// Format a destination coordinate for the `destinations` list.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hitchspot_core::destination_descriptor;
///
/// let lyon = Coord { x: 4.8357, y: 45.764 };
/// assert_eq!(destination_descriptor(lyon), "→ 45.76, 4.84");
/// ```
#[must_use]
pub fn destination_descriptor(destination: Coord<f64>) -> String {
    format!("→ {:.2}, {:.2}", destination.y, destination.x)
}

/// Provenance of a mapped spot, kept for export and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotMetadata {
    /// Identifier in the source table.
    pub original_id: Option<i64>,
    /// Total score that won the spot its place.
    pub score: f64,
    /// Cluster the spot represents.
    pub cluster: ClusterLabel,
    /// Source rating.
    pub rating: Option<f64>,
    /// Source comment.
    pub comment: Option<String>,
    /// Appreciation of the comment record, when one was produced.
    pub comment_appreciation: Option<Appreciation>,
}

/// A spot in the output schema.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpotRecord {
    /// Fresh identifier.
    pub id: Uuid,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Direction towards the destination, if one is known.
    pub direction: Option<Direction>,
    /// Road name or placeholder.
    pub road_name: String,
    /// Destination descriptors.
    pub destinations: Vec<String>,
    /// Author of the record.
    pub created_by: String,
    /// Original report time, or the import time.
    pub created_at: DateTime<Utc>,
    /// Import time.
    pub updated_at: DateTime<Utc>,
    /// Diagnostics; not part of the stored record.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub metadata: SpotMetadata,
}

impl SpotRecord {
    /// Location as a coordinate.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// A comment attached to a mapped spot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CommentRecord {
    /// Fresh identifier.
    pub id: Uuid,
    /// Identifier of the owning [`SpotRecord`].
    pub spot_id: Uuid,
    /// Verdict derived from the source rating.
    pub appreciation: Appreciation,
    /// Trimmed comment text.
    pub comment: String,
    /// Reporter nickname, or the import author.
    pub created_by: String,
    /// Original report time, or the import time.
    pub created_at: DateTime<Utc>,
    /// Import time.
    pub updated_at: DateTime<Utc>,
}

/// Options for [`map_representatives`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapperConfig {
    /// Keep at most this many spots, best scores first.
    pub max_spots: Option<usize>,
}

/// Output of the schema mapper.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedBatch {
    /// Spot records, best score first.
    pub spots: Vec<SpotRecord>,
    /// Comment records for spots with a non-blank comment.
    pub comments: Vec<CommentRecord>,
}

fn rank(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Convert representatives into spot and comment records.
///
/// Representatives are ordered by descending score, keeping input order for
/// equal scores, then truncated to `max_spots`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use hitchspot_core::{
///     ClusterLabel, MapperConfig, Representative, SpotRow, map_representatives,
/// };
///
/// let spot = SpotRow::at(48.85, 2.35)
///     .with_comment("Wide shoulder")
///     .into_spot()
///     .unwrap();
/// let reps = vec![Representative { spot, label: ClusterLabel::NOISE, score: 0.5 }];
/// let batch = map_representatives(reps, &MapperConfig::default(), Utc::now());
/// assert_eq!(batch.spots.len(), 1);
/// assert_eq!(batch.comments.len(), 1);
/// assert_eq!(batch.comments[0].spot_id, batch.spots[0].id);
/// ```
#[must_use]
pub fn map_representatives(
    mut representatives: Vec<Representative>,
    config: &MapperConfig,
    now: DateTime<Utc>,
) -> MappedBatch {
    representatives.sort_by(|a, b| rank(b.score).total_cmp(&rank(a.score)));
    if let Some(limit) = config.max_spots {
        representatives.truncate(limit);
    }

    let mut batch = MappedBatch::default();
    for representative in representatives {
        let (spot, comment) = map_one(&representative, now);
        batch.spots.push(spot);
        batch.comments.extend(comment);
    }
    log::info!(
        "Mapped {} spots and {} comments",
        batch.spots.len(),
        batch.comments.len()
    );
    batch
}

fn map_one(
    representative: &Representative,
    now: DateTime<Utc>,
) -> (SpotRecord, Option<CommentRecord>) {
    let spot = &representative.spot;
    let row = spot.row();
    let destination = spot.destination();
    let created_at = spot.timestamp().and_then(parse_timestamp).unwrap_or(now);
    let id = Uuid::new_v4();

    let comment = non_blank(spot.comment()).map(|text| CommentRecord {
        id: Uuid::new_v4(),
        spot_id: id,
        appreciation: Appreciation::from_rating(spot.rating()),
        comment: text.to_owned(),
        created_by: non_blank(row.nickname.as_deref())
            .unwrap_or(IMPORT_AUTHOR)
            .to_owned(),
        created_at,
        updated_at: now,
    });

    let record = SpotRecord {
        id,
        latitude: spot.latitude(),
        longitude: spot.longitude(),
        direction: compute_direction(spot.location(), destination),
        road_name: PLACEHOLDER_ROAD_NAME.to_owned(),
        destinations: destination.map(destination_descriptor).into_iter().collect(),
        created_by: IMPORT_AUTHOR.to_owned(),
        created_at,
        updated_at: now,
        metadata: SpotMetadata {
            original_id: row.id,
            score: representative.score,
            cluster: representative.label,
            rating: spot.rating(),
            comment: row.comment.clone(),
            comment_appreciation: comment.as_ref().map(|record| record.appreciation),
        },
    };
    (record, comment)
}
