//! Column recognition and cell coercion shared by the CSV and SQLite readers.
#![forbid(unsafe_code)]

use hitchspot_core::SpotRow;

/// A source column understood by the loader.
///
/// Both the descriptive names and the short names of the legacy dump are
/// accepted; matching ignores ASCII case and surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Id,
    Latitude,
    Longitude,
    Rating,
    Timestamp,
    Comment,
    DestinationLatitude,
    DestinationLongitude,
    Banned,
    Reviewed,
    Country,
    Wait,
    Nickname,
}

impl Column {
    /// Recognise a header, returning `None` for columns the loader ignores.
    pub(crate) fn from_header(header: &str) -> Option<Self> {
        let column = match header.trim().to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "latitude" | "lat" => Self::Latitude,
            "longitude" | "lon" | "lng" => Self::Longitude,
            "rating" => Self::Rating,
            "timestamp" | "datetime" => Self::Timestamp,
            "comment" => Self::Comment,
            "destination_latitude" | "dest_lat" => Self::DestinationLatitude,
            "destination_longitude" | "dest_lon" => Self::DestinationLongitude,
            "banned" => Self::Banned,
            "reviewed" => Self::Reviewed,
            "country" => Self::Country,
            "wait" => Self::Wait,
            "nickname" => Self::Nickname,
            _ => return None,
        };
        Some(column)
    }
}

/// Map a header row onto recognised columns, position by position.
pub(crate) fn recognise<'a, I>(headers: I) -> Vec<Option<Column>>
where
    I: IntoIterator<Item = &'a str>,
{
    headers.into_iter().map(Column::from_header).collect()
}

/// One raw value as read from a source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Cell<'a> {
    Missing,
    Integer(i64),
    Real(f64),
    Text(&'a str),
}

impl Cell<'_> {
    #[expect(
        clippy::cast_precision_loss,
        reason = "source integers are coordinates, ratings or minutes"
    )]
    fn number(self) -> Option<f64> {
        let value = match self {
            Self::Missing => return None,
            Self::Integer(value) => value as f64,
            Self::Real(value) => value,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "only integral values within the i64 range are converted"
    )]
    #[expect(
        clippy::float_arithmetic,
        reason = "integral check on a real-valued identifier"
    )]
    fn integer(self) -> Option<i64> {
        match self {
            Self::Integer(value) => return Some(value),
            Self::Text(text) => {
                if let Ok(value) = text.trim().parse() {
                    return Some(value);
                }
            }
            Self::Missing | Self::Real(_) => {}
        }
        let value = self.number()?;
        let integral = value.fract() == 0.0 && value.abs() < 9.0e15;
        integral.then_some(value as i64)
    }

    fn flag(self) -> bool {
        match self {
            Self::Missing => false,
            Self::Integer(value) => value != 0,
            Self::Real(value) => value != 0.0,
            Self::Text(text) => parse_flag(text),
        }
    }

    fn text(self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Integer(value) => Some(value.to_string()),
            Self::Real(value) => Some(value.to_string()),
            Self::Text(text) => (!text.trim().is_empty()).then(|| text.to_owned()),
        }
    }
}

/// Interpret a boolean-like text value.
///
/// `1`, `true`, `yes`, `t` and `y` (any case) are true; numeric text is true
/// when non-zero; everything else, including the empty string, is false.
pub(crate) fn parse_flag(text: &str) -> bool {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "t" | "y" => true,
        "" | "0" | "false" | "no" | "f" | "n" => false,
        _ => trimmed.parse::<f64>().is_ok_and(|value| value != 0.0),
    }
}

/// Store `cell` in the field named by `column`.
///
/// A missing or unparsable value never clears a field set by an earlier
/// alias of the same column; flags are combined with a logical or.
pub(crate) fn apply(row: &mut SpotRow, column: Column, cell: Cell<'_>) {
    fn keep<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    match column {
        Column::Id => keep(&mut row.id, cell.integer()),
        Column::Latitude => keep(&mut row.latitude, cell.number()),
        Column::Longitude => keep(&mut row.longitude, cell.number()),
        Column::Rating => keep(&mut row.rating, cell.number()),
        Column::Timestamp => keep(&mut row.timestamp, cell.text()),
        Column::Comment => keep(&mut row.comment, cell.text()),
        Column::DestinationLatitude => keep(&mut row.destination_latitude, cell.number()),
        Column::DestinationLongitude => keep(&mut row.destination_longitude, cell.number()),
        Column::Banned => row.banned |= cell.flag(),
        Column::Reviewed => row.reviewed |= cell.flag(),
        Column::Country => keep(&mut row.country, cell.text().map(|c| c.trim().to_owned())),
        Column::Wait => keep(&mut row.wait, cell.number()),
        Column::Nickname => keep(&mut row.nickname, cell.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lat", Some(Column::Latitude))]
    #[case(" Latitude ", Some(Column::Latitude))]
    #[case("dest_lon", Some(Column::DestinationLongitude))]
    #[case("datetime", Some(Column::Timestamp))]
    #[case("ride_id", None)]
    fn recognises_long_and_short_headers(#[case] header: &str, #[case] expected: Option<Column>) {
        assert_eq!(Column::from_header(header), expected);
    }

    #[rstest]
    #[case("1", true)]
    #[case("TRUE", true)]
    #[case("Yes", true)]
    #[case("t", true)]
    #[case("1.0", true)]
    #[case("0", false)]
    #[case("no", false)]
    #[case("F", false)]
    #[case("", false)]
    #[case("maybe", false)]
    fn parses_flags(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(text), expected);
    }

    #[rstest]
    fn unparsable_numbers_become_missing() {
        let mut row = SpotRow::default();
        apply(&mut row, Column::Rating, Cell::Text("n/a"));
        apply(&mut row, Column::Latitude, Cell::Text(" 48.85 "));
        apply(&mut row, Column::Longitude, Cell::Integer(2));
        assert_eq!(row.rating, None);
        assert_eq!(row.latitude, Some(48.85));
        assert_eq!(row.longitude, Some(2.0));
    }

    #[rstest]
    fn identifiers_accept_integral_values() {
        let mut row = SpotRow::default();
        apply(&mut row, Column::Id, Cell::Real(42.0));
        assert_eq!(row.id, Some(42));
        apply(&mut row, Column::Id, Cell::Real(4.5));
        assert_eq!(row.id, Some(42));
        apply(&mut row, Column::Id, Cell::Text("7"));
        assert_eq!(row.id, Some(7));
    }

    #[rstest]
    fn later_missing_alias_keeps_earlier_value() {
        let mut row = SpotRow::default();
        apply(&mut row, Column::Latitude, Cell::Real(10.0));
        apply(&mut row, Column::Latitude, Cell::Missing);
        apply(&mut row, Column::Banned, Cell::Integer(1));
        apply(&mut row, Column::Banned, Cell::Text(""));
        assert_eq!(row.latitude, Some(10.0));
        assert!(row.banned);
    }

    #[rstest]
    fn blank_text_is_missing() {
        let mut row = SpotRow::default();
        apply(&mut row, Column::Comment, Cell::Text("   "));
        apply(&mut row, Column::Country, Cell::Text(" FR "));
        assert_eq!(row.comment, None);
        assert_eq!(row.country.as_deref(), Some("FR"));
    }
}
