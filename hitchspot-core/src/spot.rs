//! Spot records as loaded from a source table and after validation.
//!
//! [`SpotRow`] mirrors one row of the raw table: every column is optional and
//! nothing is trusted. [`Spot`] is a row whose coordinates passed the range
//! check, so everything downstream of the filter can rely on a finite,
//! in-range location.

use geo::Coord;

/// Latitude range accepted for WGS84 coordinates, in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
/// Longitude range accepted for WGS84 coordinates, in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Report whether a latitude/longitude pair is finite and within range.
///
/// # Examples
/// ```
/// use hitchspot_core::is_valid_coordinate;
///
/// assert!(is_valid_coordinate(48.85, 2.35));
/// assert!(!is_valid_coordinate(91.0, 0.0));
/// assert!(!is_valid_coordinate(f64::NAN, 0.0));
/// ```
#[must_use]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && LATITUDE_RANGE.contains(&latitude)
        && LONGITUDE_RANGE.contains(&longitude)
}

/// One raw row of the spot table.
///
/// Field names follow the long column names; loaders also accept the short
/// names of the legacy dump (`lat`, `lon`, `dest_lat`, `dest_lon`,
/// `datetime`).
///
/// # Examples
/// ```
/// use hitchspot_core::SpotRow;
///
/// let row = SpotRow::at(48.85, 2.35)
///     .with_rating(4.0)
///     .with_comment("Good petrol station exit");
/// assert_eq!(row.rating, Some(4.0));
/// assert!(row.into_spot().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpotRow {
    /// Identifier in the source table.
    pub id: Option<i64>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Numeric rating left by the reporter.
    pub rating: Option<f64>,
    /// Free-form timestamp as stored in the source.
    pub timestamp: Option<String>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Latitude of the destination the reporter was heading for.
    pub destination_latitude: Option<f64>,
    /// Longitude of the destination the reporter was heading for.
    pub destination_longitude: Option<f64>,
    /// Row was banned by moderators.
    pub banned: bool,
    /// Row was reviewed by moderators.
    pub reviewed: bool,
    /// ISO country code.
    pub country: Option<String>,
    /// Reported waiting time in minutes.
    pub wait: Option<f64>,
    /// Reporter nickname.
    pub nickname: Option<String>,
}

impl SpotRow {
    /// Start a row at the given coordinate with every other column empty.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    /// Set the source identifier.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the raw timestamp string.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the destination coordinate.
    #[must_use]
    pub fn with_destination(mut self, latitude: f64, longitude: f64) -> Self {
        self.destination_latitude = Some(latitude);
        self.destination_longitude = Some(longitude);
        self
    }

    /// Set the reported waiting time.
    #[must_use]
    pub fn with_wait(mut self, minutes: f64) -> Self {
        self.wait = Some(minutes);
        self
    }

    /// Set the country code.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the reporter nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Mark the row as banned.
    #[must_use]
    pub fn banned(mut self) -> Self {
        self.banned = true;
        self
    }

    /// Mark the row as reviewed.
    #[must_use]
    pub fn reviewed(mut self) -> Self {
        self.reviewed = true;
        self
    }

    /// Return the location when both coordinates are present and valid.
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        valid_coord(self.latitude, self.longitude)
    }

    /// Return the destination when both coordinates are present and valid.
    #[must_use]
    pub fn destination(&self) -> Option<Coord<f64>> {
        valid_coord(self.destination_latitude, self.destination_longitude)
    }

    /// Validate the row into a [`Spot`].
    ///
    /// Returns `None` when a coordinate is missing, not finite or out of
    /// range.
    #[must_use]
    pub fn into_spot(self) -> Option<Spot> {
        Spot::from_row(self)
    }
}

fn valid_coord(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coord<f64>> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if is_valid_coordinate(lat, lon) => Some(Coord { x: lon, y: lat }),
        _ => None,
    }
}

/// A row whose location is known to be valid.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    location: Coord<f64>,
    row: SpotRow,
}

impl Spot {
    /// Validate a row, returning `None` for missing or out-of-range
    /// coordinates.
    #[must_use]
    pub fn from_row(row: SpotRow) -> Option<Self> {
        let location = row.location()?;
        Some(Self { location, row })
    }

    /// Validated location.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Destination coordinate, if complete and valid.
    #[must_use]
    pub fn destination(&self) -> Option<Coord<f64>> {
        self.row.destination()
    }

    /// Rating, ignoring non-finite values.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.row.rating.filter(|value| value.is_finite())
    }

    /// Raw timestamp string.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.row.timestamp.as_deref()
    }

    /// Comment text.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.row.comment.as_deref()
    }

    /// Report whether a waiting time was recorded.
    #[must_use]
    pub fn has_wait(&self) -> bool {
        self.row.wait.is_some_and(f64::is_finite)
    }

    /// The underlying row.
    #[must_use]
    pub const fn row(&self) -> &SpotRow {
        &self.row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(48.85), Some(2.35), true)]
    #[case(Some(90.0), Some(180.0), true)]
    #[case(Some(-90.0), Some(-180.0), true)]
    #[case(None, Some(2.35), false)]
    #[case(Some(48.85), None, false)]
    #[case(Some(90.5), Some(0.0), false)]
    #[case(Some(0.0), Some(-180.1), false)]
    #[case(Some(f64::NAN), Some(0.0), false)]
    #[case(Some(0.0), Some(f64::INFINITY), false)]
    fn validates_row_coordinates(
        #[case] latitude: Option<f64>,
        #[case] longitude: Option<f64>,
        #[case] valid: bool,
    ) {
        let row = SpotRow {
            latitude,
            longitude,
            ..SpotRow::default()
        };
        assert_eq!(row.into_spot().is_some(), valid);
    }

    #[rstest]
    fn spot_keeps_axis_order() {
        let spot = SpotRow::at(48.85, 2.35).into_spot().expect("valid spot");
        assert_eq!(spot.location(), Coord { x: 2.35, y: 48.85 });
        assert_eq!(spot.latitude(), 48.85);
        assert_eq!(spot.longitude(), 2.35);
    }

    #[rstest]
    fn partial_destination_is_ignored() {
        let mut row = SpotRow::at(1.0, 1.0);
        row.destination_latitude = Some(2.0);
        assert!(row.destination().is_none());
    }

    #[rstest]
    fn non_finite_rating_reads_as_missing() {
        let spot = SpotRow::at(0.0, 0.0)
            .with_rating(f64::NAN)
            .into_spot()
            .expect("valid spot");
        assert!(spot.rating().is_none());
    }
}
