use crate::gpx::GeoPoint;

/// Mean Earth radius in meters, spherical approximation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine).
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total length of a point sequence in meters. Zero below two points.
pub fn cumulative_distance(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
}

/// Distance from the route start to each vertex. `prefix[0]` is 0 and
/// `prefix[len - 1]` equals `cumulative_distance`.
pub fn prefix_distances(points: &[GeoPoint]) -> Vec<f64> {
    let mut prefix = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += distance(&points[i - 1], point);
        }
        prefix.push(total);
    }
    prefix
}

/// Index of the vertex geodesically nearest to `target`. Ties break by
/// the first minimum in iteration order. Returns `None` for an empty
/// sequence.
pub fn nearest_vertex(points: &[GeoPoint], target: &GeoPoint) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, point) in points.iter().enumerate() {
        let d = distance(point, target);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon, 0.0)
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance(&p(0.0, 0.0), &p(0.0, 1.0));
        // R * 1° in radians = 111 194.9 m
        assert!((d - 111_194.9).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = p(48.1372, 11.5756);
        let b = p(52.5186, 13.4083);
        assert_eq!(distance(&a, &a), 0.0);
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-9);
        // Munich to Berlin, roughly 504 km
        assert!((distance(&a, &b) - 504_000.0).abs() < 2_000.0);
    }

    #[test]
    fn cumulative_distance_handles_short_sequences() {
        assert_eq!(cumulative_distance(&[]), 0.0);
        assert_eq!(cumulative_distance(&[p(1.0, 2.0)]), 0.0);
    }

    #[test]
    fn cumulative_distance_is_monotone() {
        let points: Vec<GeoPoint> = (0..20).map(|i| p(0.0, i as f64 * 0.01)).collect();
        let mut previous = 0.0;
        for n in 2..=points.len() {
            let d = cumulative_distance(&points[..n]);
            assert!(d >= previous);
            previous = d;
        }
    }

    #[test]
    fn prefix_distances_match_cumulative() {
        let points: Vec<GeoPoint> = (0..5).map(|i| p(0.0, i as f64 * 0.1)).collect();
        let prefix = prefix_distances(&points);
        assert_eq!(prefix.len(), points.len());
        assert_eq!(prefix[0], 0.0);
        assert!((prefix[4] - cumulative_distance(&points)).abs() < 1e-6);
    }

    #[test]
    fn nearest_vertex_prefers_first_minimum() {
        let points = vec![p(0.0, 0.0), p(0.0, 0.5), p(0.0, 0.5), p(0.0, 1.0)];
        assert_eq!(nearest_vertex(&points, &p(0.0, 0.49)), Some(1));
        assert_eq!(nearest_vertex(&[], &p(0.0, 0.0)), None);
    }
}
