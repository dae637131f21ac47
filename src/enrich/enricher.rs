use std::collections::HashSet;

use crate::geo;
use crate::gpx::Track;
use crate::overpass::{OverpassTransport, PoiClient};

use super::error::EnrichError;
use super::sampler::sample_route;
use super::types::{EnrichOptions, EnrichedStation};

/// Run the full enrichment pipeline over one track: sample the route,
/// look up fuel stations near each sample, attribute each accepted
/// station to a distance along the route, and return the stations
/// sorted by that distance.
///
/// Only the first segment is sampled. Lookups happen one sample at a
/// time; a failed lookup costs that sample its station, nothing more.
pub async fn enrich_track<T: OverpassTransport>(
    track: &Track,
    client: &mut PoiClient<T>,
    options: &EnrichOptions,
) -> Result<Vec<EnrichedStation>, EnrichError> {
    let points = track.primary_points();
    if points.is_empty() {
        return Err(EnrichError::NoRouteData);
    }

    let prefix = geo::prefix_distances(points);
    let total_m = *prefix.last().unwrap_or(&0.0);
    let count = sample_count(total_m, options.min_interval_km);

    log::info!(
        "enriching '{}': {:.1} km, {} samples",
        track.name,
        total_m / 1000.0,
        count
    );

    let samples = sample_route(points, count);

    let mut seen: HashSet<String> = HashSet::new();
    let mut enriched = Vec::new();

    for sample in samples {
        let candidates = client.find(&sample, options.max_distance_m).await;
        // Candidates arrive sorted; the nearest one wins.
        let Some(station) = candidates.into_iter().next() else {
            continue;
        };
        if !seen.insert(station.id.clone()) {
            continue;
        }

        // Snap the sample back onto the nearest route vertex and read
        // the distance-from-start off the prefix table. Approximate on
        // sparse routes, but stable.
        let vertex = geo::nearest_vertex(points, &sample).unwrap_or(0);
        enriched.push(EnrichedStation {
            station,
            distance_along_route_m: prefix[vertex],
            sample,
        });
    }

    enriched.sort_by(|a, b| a.distance_along_route_m.total_cmp(&b.distance_along_route_m));
    Ok(enriched)
}

/// Denser sampling for longer routes, never fewer than one sample.
/// The measured length of a nominally n-interval route can land
/// fractionally under the boundary; the slack absorbs that, so such a
/// route still counts the full multiple.
fn sample_count(total_m: f64, min_interval_km: f64) -> usize {
    const BOUNDARY_SLACK: f64 = 1e-4;
    let total_km = total_m / 1000.0;
    ((total_km / min_interval_km + BOUNDARY_SLACK).floor() as usize).max(1)
}
