//! Compass direction from a spot towards its destination.

use std::fmt;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of eight 45° compass sectors, centred on North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// `[-22.5°, 22.5°)`.
    North,
    /// `[22.5°, 67.5°)`.
    #[cfg_attr(feature = "serde", serde(rename = "North-East"))]
    NorthEast,
    /// `[67.5°, 112.5°)`.
    East,
    /// `[112.5°, 157.5°)`.
    #[cfg_attr(feature = "serde", serde(rename = "South-East"))]
    SouthEast,
    /// `[157.5°, 180°]` and `[-180°, -157.5°)`.
    South,
    /// `[-157.5°, -112.5°)`.
    #[cfg_attr(feature = "serde", serde(rename = "South-West"))]
    SouthWest,
    /// `[-112.5°, -67.5°)`.
    West,
    /// `[-67.5°, -22.5°)`.
    #[cfg_attr(feature = "serde", serde(rename = "North-West"))]
    NorthWest,
}

impl Direction {
    /// Classify an angle in degrees, measured clockwise from North within
    /// `[-180, 180]`.
    ///
    /// Returns `None` for non-finite angles.
    ///
    /// # Examples
    /// ```
    /// use hitchspot_core::Direction;
    ///
    /// assert_eq!(Direction::from_angle(0.0), Some(Direction::North));
    /// assert_eq!(Direction::from_angle(180.0), Some(Direction::South));
    /// assert_eq!(Direction::from_angle(-180.0), Some(Direction::South));
    /// assert_eq!(Direction::from_angle(f64::NAN), None);
    /// ```
    #[must_use]
    pub fn from_angle(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let direction = match degrees {
            a if a >= 157.5 || a < -157.5 => Self::South,
            a if a >= 112.5 => Self::SouthEast,
            a if a >= 67.5 => Self::East,
            a if a >= 22.5 => Self::NorthEast,
            a if a >= -22.5 => Self::North,
            a if a >= -67.5 => Self::NorthWest,
            a if a >= -112.5 => Self::West,
            _ => Self::SouthWest,
        };
        Some(direction)
    }

    /// Human-readable label, as stored in exported records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::NorthEast => "North-East",
            Self::East => "East",
            Self::SouthEast => "South-East",
            Self::South => "South",
            Self::SouthWest => "South-West",
            Self::West => "West",
            Self::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of travel from `from` towards `to`.
///
/// Uses the planar bearing `atan2(Δlon, Δlat)`, which is adequate for the
/// short hops between a spot and the first leg of its destination.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hitchspot_core::{Direction, compute_direction};
///
/// let paris = Coord { x: 2.35, y: 48.85 };
/// let lyon = Coord { x: 4.84, y: 45.76 };
/// assert_eq!(compute_direction(paris, Some(lyon)), Some(Direction::SouthEast));
/// assert_eq!(compute_direction(paris, None), None);
/// ```
#[must_use]
pub fn compute_direction(from: Coord<f64>, to: Option<Coord<f64>>) -> Option<Direction> {
    let to = to?;
    let angle = (to.x - from.x).atan2(to.y - from.y).to_degrees();
    Direction::from_angle(angle)
}
