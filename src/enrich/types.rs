use crate::gpx::GeoPoint;

/// A fuel station candidate as returned by the POI client. The
/// distance is straight-line from the query center, not along the
/// route.
#[derive(Debug, Clone)]
pub struct FuelStation {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub location: GeoPoint,
    pub straight_line_distance_m: f64,
}

/// A candidate accepted for output, annotated with where along the
/// route it belongs.
#[derive(Debug, Clone)]
pub struct EnrichedStation {
    pub station: FuelStation,
    pub distance_along_route_m: f64,
    pub sample: GeoPoint,
}

/// Tunables for one enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Search radius around each sample, meters.
    pub max_distance_m: f64,
    /// Minimum spacing between consecutive samples, kilometers.
    pub min_interval_km: f64,
    /// Upper spacing bound, kilometers. Accepted and carried but not
    /// used by the sampling formula.
    #[allow(dead_code)]
    pub max_interval_km: f64,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            max_distance_m: 1_000.0,
            min_interval_km: 50.0,
            max_interval_km: 80.0,
        }
    }
}
