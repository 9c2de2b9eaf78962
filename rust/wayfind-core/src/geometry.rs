use crate::models::Coordinate;

/// Mean Earth radius in meters; the authoritative distance metric across
/// the whole engine derives from it.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance in meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Initial great-circle bearing from `a` to `b`, degrees in [0, 360).
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub coord: Coordinate,
    pub distance_m: f64,
}

/// Orthogonal projection of `p` onto the segment `a`->`b`, clamped to the
/// segment interval.
///
/// Lat/lng are treated as Cartesian here: a planar approximation that holds
/// at campus scale only. Do not reuse this for city-scale or larger
/// deployments without switching to a geodesic projection.
pub fn project_onto_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> Projection {
    let dx = b.lat - a.lat;
    let dy = b.lng - a.lng;
    let len2 = dx * dx + dy * dy;

    if len2 == 0.0 {
        // Degenerate zero-length segment
        return Projection { coord: a, distance_m: haversine_distance(p, a) };
    }

    let t = (((p.lat - a.lat) * dx + (p.lng - a.lng) * dy) / len2).clamp(0.0, 1.0);
    let coord = Coordinate::new(a.lat + t * dx, a.lng + t * dy);
    Projection { coord, distance_m: haversine_distance(p, coord) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinate::new(14.0642, 121.3233);
        let b = Coordinate::new(14.0677, 121.3301);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = haversine_distance(a, b);
        // One degree of arc on the mean sphere is ~111.19 km
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn bearing_cardinal_directions() {
        let o = Coordinate::new(0.0, 0.0);
        assert!((bearing(o, Coordinate::new(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((bearing(o, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((bearing(o, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((bearing(o, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn projection_clamps_to_segment() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);

        // Beyond the far end: clamps to b
        let p = project_onto_segment(Coordinate::new(0.5, 2.0), a, b);
        assert_eq!(p.coord, b);

        // Before the near end: clamps to a
        let p = project_onto_segment(Coordinate::new(-0.5, -1.0), a, b);
        assert_eq!(p.coord, a);

        // Interior point projects orthogonally
        let p = project_onto_segment(Coordinate::new(0.25, 0.5), a, b);
        assert!((p.coord.lat - 0.0).abs() < 1e-12);
        assert!((p.coord.lng - 0.5).abs() < 1e-12);
    }

    #[test]
    fn projection_degenerate_segment_falls_back_to_endpoint() {
        let a = Coordinate::new(1.0, 1.0);
        let p = project_onto_segment(Coordinate::new(2.0, 1.0), a, a);
        assert_eq!(p.coord, a);
        assert!((p.distance_m - haversine_distance(Coordinate::new(2.0, 1.0), a)).abs() < 1e-9);
    }
}
