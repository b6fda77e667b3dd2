//! R\*-tree neighbourhood queries under the haversine metric.
//!
//! The tree stores `(longitude, latitude)` pairs in degrees. Queries first
//! collect candidates from a bounding envelope that contains the whole
//! spherical cap of the requested radius, then keep only the candidates whose
//! central angle is within the radius.

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};

use crate::distance::central_angle;

/// Slack added to envelope edges so rounding never excludes a boundary point.
const ENVELOPE_SLACK_DEGREES: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct IndexedLocation {
    index: usize,
    location: Coord<f64>,
}

impl RTreeObject for IndexedLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x, self.location.y])
    }
}

/// Spatial index over a slice of validated locations.
#[derive(Debug)]
pub(crate) struct NeighbourIndex {
    tree: RTree<IndexedLocation>,
}

impl NeighbourIndex {
    pub(crate) fn build(locations: &[Coord<f64>]) -> Self {
        let entries = locations
            .iter()
            .enumerate()
            .map(|(index, &location)| IndexedLocation { index, location })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Indices of every location within `radius` radians of `centre`,
    /// including `centre` itself when indexed, sorted ascending.
    pub(crate) fn within(&self, centre: Coord<f64>, radius: f64) -> Vec<usize> {
        let mut found: Vec<usize> = cap_envelopes(centre, radius)
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope_intersecting(envelope))
            .filter(|entry| central_angle(centre, entry.location) <= radius)
            .map(|entry| entry.index)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Envelopes whose union contains the spherical cap of `radius` radians.
///
/// Caps that reach a pole span every longitude. Caps that cross the
/// antimeridian are split in two.
fn cap_envelopes(centre: Coord<f64>, radius: f64) -> Vec<AABB<[f64; 2]>> {
    let latitude = centre.y;
    let half_height = radius.to_degrees() + ENVELOPE_SLACK_DEGREES;
    let south = latitude - half_height;
    let north = latitude + half_height;
    if south <= -90.0 || north >= 90.0 {
        return vec![band(-180.0, 180.0, south.max(-90.0), north.min(90.0))];
    }

    let ratio = radius.sin() / latitude.to_radians().cos();
    if ratio >= 1.0 {
        return vec![band(-180.0, 180.0, south, north)];
    }
    let half_width = ratio.asin().to_degrees() + ENVELOPE_SLACK_DEGREES;
    let west = centre.x - half_width;
    let east = centre.x + half_width;
    if half_width >= 180.0 {
        vec![band(-180.0, 180.0, south, north)]
    } else if west < -180.0 {
        vec![
            band(west + 360.0, 180.0, south, north),
            band(-180.0, east, south, north),
        ]
    } else if east > 180.0 {
        vec![
            band(west, 180.0, south, north),
            band(-180.0, east - 360.0, south, north),
        ]
    } else {
        vec![band(west, east, south, north)]
    }
}

fn band(west: f64, east: f64, south: f64, north: f64) -> AABB<[f64; 2]> {
    AABB::from_corners([west, south], [east, north])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::km_to_radians;
    use rstest::rstest;

    fn coord(lat: f64, lon: f64) -> Coord<f64> {
        Coord { x: lon, y: lat }
    }

    fn brute_force(locations: &[Coord<f64>], centre: Coord<f64>, radius: f64) -> Vec<usize> {
        locations
            .iter()
            .enumerate()
            .filter(|(_, location)| central_angle(centre, **location) <= radius)
            .map(|(index, _)| index)
            .collect()
    }

    #[rstest]
    fn finds_neighbours_within_radius() {
        let locations = vec![
            coord(48.85, 2.35),
            coord(48.851, 2.351),
            coord(48.95, 2.35),
        ];
        let index = NeighbourIndex::build(&locations);
        let found = index.within(coord(48.85, 2.35), km_to_radians(0.3));
        assert_eq!(found, vec![0, 1]);
    }

    #[rstest]
    #[case(coord(0.0, 179.999), vec![coord(0.0, -179.999), coord(0.0, 179.5)])]
    #[case(coord(0.0, -179.999), vec![coord(0.0, 179.999), coord(0.0, -179.5)])]
    #[case(coord(89.999, 0.0), vec![coord(89.999, 180.0), coord(89.0, 0.0)])]
    #[case(coord(-89.999, 90.0), vec![coord(-89.999, -90.0), coord(-89.0, 0.0)])]
    #[case(coord(70.0, 10.0), vec![coord(70.0, 10.01), coord(70.01, 10.0)])]
    fn agrees_with_exhaustive_search(#[case] centre: Coord<f64>, #[case] others: Vec<Coord<f64>>) {
        let mut locations = vec![centre];
        locations.extend(others);
        let radius = km_to_radians(1.0);
        let index = NeighbourIndex::build(&locations);
        assert_eq!(
            index.within(centre, radius),
            brute_force(&locations, centre, radius)
        );
    }

    #[rstest]
    fn crossing_the_antimeridian_splits_the_envelope() {
        let envelopes = cap_envelopes(coord(0.0, 179.999), km_to_radians(1.0));
        assert_eq!(envelopes.len(), 2);
    }

    #[rstest]
    fn polar_caps_span_all_longitudes() {
        let envelopes = cap_envelopes(coord(89.999, 0.0), km_to_radians(1.0));
        assert_eq!(envelopes.len(), 1);
        let envelope = envelopes.first().expect("one envelope");
        assert_eq!(envelope.lower()[0], -180.0);
        assert_eq!(envelope.upper()[0], 180.0);
    }
}
