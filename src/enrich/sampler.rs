use crate::geo;
use crate::gpx::GeoPoint;

/// Place `count` evenly distance-spaced samples along a point
/// sequence. The first sample is the exact start and, for `count > 1`,
/// the last is the exact end. Intermediate samples interpolate
/// latitude, longitude and elevation linearly within the segment that
/// contains their target distance.
///
/// Callers guarantee a non-empty sequence and `count >= 1`.
pub fn sample_route(points: &[GeoPoint], count: usize) -> Vec<GeoPoint> {
    debug_assert!(!points.is_empty());
    debug_assert!(count >= 1);

    if count == 1 || points.len() < 2 {
        return vec![points[0]];
    }

    let total = geo::cumulative_distance(points);
    let mut samples = Vec::with_capacity(count);
    for i in 0..count {
        let target = i as f64 * total / (count - 1) as f64;
        samples.push(point_at_distance(points, target, total));
    }
    samples
}

fn point_at_distance(points: &[GeoPoint], target: f64, total: f64) -> GeoPoint {
    // Floating-point edge case at the final sample.
    if target >= total {
        return points[points.len() - 1];
    }

    let mut travelled = 0.0;
    for window in points.windows(2) {
        let leg = geo::distance(&window[0], &window[1]);
        if travelled + leg >= target && leg > 0.0 {
            let fraction = (target - travelled) / leg;
            return interpolate(&window[0], &window[1], fraction);
        }
        travelled += leg;
    }

    points[points.len() - 1]
}

fn interpolate(a: &GeoPoint, b: &GeoPoint, fraction: f64) -> GeoPoint {
    GeoPoint::new(
        a.latitude + (b.latitude - a.latitude) * fraction,
        a.longitude + (b.longitude - a.longitude) * fraction,
        a.elevation + (b.elevation - a.elevation) * fraction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_route(count: usize, step_deg: f64) -> Vec<GeoPoint> {
        (0..count)
            .map(|i| GeoPoint::new(0.0, i as f64 * step_deg, (i * 10) as f64))
            .collect()
    }

    #[test]
    fn single_sample_is_the_route_start() {
        let points = straight_route(10, 0.01);
        let samples = sample_route(&points, 1);
        assert_eq!(samples, vec![points[0]]);
    }

    #[test]
    fn returns_exactly_n_samples_ending_at_the_route_end() {
        let points = straight_route(11, 0.01);
        for count in [2, 3, 5, 11, 20] {
            let samples = sample_route(&points, count);
            assert_eq!(samples.len(), count);
            assert_eq!(samples[0], points[0]);
            let last = samples.last().unwrap();
            let end = points.last().unwrap();
            assert!((last.latitude - end.latitude).abs() < 1e-9);
            assert!((last.longitude - end.longitude).abs() < 1e-9);
        }
    }

    #[test]
    fn midpoint_sample_interpolates_position_and_elevation() {
        // Two-point route: the middle sample sits halfway.
        let points = vec![
            GeoPoint::new(0.0, 0.0, 100.0),
            GeoPoint::new(0.0, 1.0, 300.0),
        ];
        let samples = sample_route(&points, 3);
        assert!((samples[1].longitude - 0.5).abs() < 1e-6);
        assert!((samples[1].elevation - 200.0).abs() < 1e-6);
    }

    #[test]
    fn samples_are_evenly_spaced_along_the_route() {
        let points = straight_route(151, 0.01);
        let total = crate::geo::cumulative_distance(&points);
        let samples = sample_route(&points, 4);
        for (i, pair) in samples.windows(2).enumerate() {
            let spacing = crate::geo::distance(&pair[0], &pair[1]);
            assert!(
                (spacing - total / 3.0).abs() < total * 1e-6,
                "uneven spacing at {}: {}",
                i,
                spacing
            );
        }
    }

    #[test]
    fn zero_length_route_collapses_to_the_sole_point() {
        let point = GeoPoint::new(48.0, 11.0, 500.0);
        let points = vec![point, point];
        let samples = sample_route(&points, 3);
        assert_eq!(samples.len(), 3);
        for sample in samples {
            assert_eq!(sample, point);
        }
    }

    #[test]
    fn single_point_route_yields_that_point() {
        let points = vec![GeoPoint::new(48.0, 11.0, 0.0)];
        assert_eq!(sample_route(&points, 5), vec![points[0]]);
    }
}
