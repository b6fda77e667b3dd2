//! Great-circle distances on a spherical Earth.
//!
//! Coordinates are WGS84 degrees with `x = longitude` and `y = latitude`.
//! The clustering engine works in angular units ([`central_angle`]) and
//! converts its kilometre threshold with [`km_to_radians`]; callers that want
//! a human-readable distance use [`haversine_km`].

use geo::Coord;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Angular distance between two coordinates, in radians.
///
/// The haversine term is clamped to `[0, 1]` so rounding never pushes
/// `asin` out of its domain for coincident or antipodal points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hitchspot_core::central_angle;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 180.0, y: 0.0 };
/// assert!((central_angle(a, b) - std::f64::consts::PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn central_angle(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (b.x - a.x).to_radians() / 2.0;
    let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance between two coordinates, in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hitchspot_core::haversine_km;
///
/// let paris = Coord { x: 2.3522, y: 48.8566 };
/// let london = Coord { x: -0.1276, y: 51.5072 };
/// let km = haversine_km(paris, london);
/// assert!((km - 343.5).abs() < 1.0);
/// assert_eq!(haversine_km(paris, paris), 0.0);
/// ```
#[must_use]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

/// Convert a surface distance in kilometres to an angle in radians.
#[must_use]
pub fn km_to_radians(km: f64) -> f64 {
    km / EARTH_RADIUS_KM
}
