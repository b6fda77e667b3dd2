//! Write mapped spots as plain JSON or as GeoJSON for visual inspection.
//!
//! Plain JSON holds the records exactly as they would be uploaded; the
//! per-spot import metadata is dropped. GeoJSON keeps the metadata that
//! helps review a run (score, rating, comment) as feature properties.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use hitchspot_core::{Appreciation, Direction, SpotRecord};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while exporting spots.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialising the records failed.
    #[error("failed to serialise spots for {path}")]
    Serialise {
        /// Destination path.
        path: Utf8PathBuf,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the file failed.
    #[error("failed to write {path}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Shape of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON array of spot records.
    Json,
    /// GeoJSON `FeatureCollection` of points.
    GeoJson,
}

impl OutputFormat {
    /// GeoJSON when requested explicitly or when `path` ends in `.geojson`.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use hitchspot_data::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::detect(Utf8Path::new("out.json"), false), OutputFormat::Json);
    /// assert_eq!(OutputFormat::detect(Utf8Path::new("out.json"), true), OutputFormat::GeoJson);
    /// assert_eq!(OutputFormat::detect(Utf8Path::new("out.geojson"), false), OutputFormat::GeoJson);
    /// ```
    #[must_use]
    pub fn detect(path: &Utf8Path, geojson: bool) -> Self {
        let by_extension = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("geojson"));
        if geojson || by_extension {
            Self::GeoJson
        } else {
            Self::Json
        }
    }
}

/// Write `spots` to `path` in `format`, creating parent directories.
///
/// # Errors
/// Returns [`ExportError`] when serialisation or the write fails.
pub fn export_spots(
    path: &Utf8Path,
    spots: &[SpotRecord],
    format: OutputFormat,
) -> Result<(), ExportError> {
    match format {
        OutputFormat::Json => write_spots_json(path, spots),
        OutputFormat::GeoJson => write_geojson(path, spots),
    }
}

/// Write the records as a pretty-printed JSON array.
///
/// # Errors
/// Returns [`ExportError`] when serialisation or the write fails.
pub fn write_spots_json(path: &Utf8Path, spots: &[SpotRecord]) -> Result<(), ExportError> {
    write_pretty(path, &spots)?;
    log::info!("Exported {} spots to {path}", spots.len());
    Ok(())
}

/// Write the records as a GeoJSON `FeatureCollection`.
///
/// # Errors
/// Returns [`ExportError`] when serialisation or the write fails.
pub fn write_geojson(path: &Utf8Path, spots: &[SpotRecord]) -> Result<(), ExportError> {
    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features: spots.iter().map(Feature::from_record).collect(),
    };
    write_pretty(path, &collection)?;
    log::info!("Exported {} spots to {path}", spots.len());
    Ok(())
}

fn write_pretty<T: Serialize + ?Sized>(path: &Utf8Path, value: &T) -> Result<(), ExportError> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| ExportError::Serialise {
            path: path.to_path_buf(),
            source,
        })?;
    bytes.push(b'\n');
    hitchspot_fs::write_utf8_file(path, &bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Point,
    properties: Properties<'a>,
}

#[derive(Serialize)]
struct Point {
    #[serde(rename = "type")]
    kind: &'static str,
    /// `[longitude, latitude]`.
    coordinates: [f64; 2],
}

#[derive(Serialize)]
struct Properties<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    direction: Option<Direction>,
    road_name: &'a str,
    score: Option<f64>,
    rating: Option<f64>,
    comment: Option<&'a str>,
    comment_appreciation: Option<Appreciation>,
}

impl<'a> Feature<'a> {
    fn from_record(record: &'a SpotRecord) -> Self {
        let metadata = &record.metadata;
        Self {
            kind: "Feature",
            geometry: Point {
                kind: "Point",
                coordinates: [record.longitude, record.latitude],
            },
            properties: Properties {
                id: record.id,
                created_at: record.created_at,
                direction: record.direction,
                road_name: &record.road_name,
                score: Some(metadata.score).filter(|score| score.is_finite()),
                rating: metadata.rating,
                comment: metadata.comment.as_deref(),
                comment_appreciation: metadata.comment_appreciation,
            },
        }
    }
}
