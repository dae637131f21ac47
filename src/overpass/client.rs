use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::enrich::FuelStation;
use crate::geo;
use crate::gpx::GeoPoint;

use super::error::OverpassError;
use super::types::{OverpassElement, OverpassResponse};

/// At most this many candidates are kept per sample location.
pub const MAX_STATIONS_PER_SAMPLE: usize = 3;

/// Cache keys round coordinates to 3 decimal places, a grid of roughly
/// 111 m. Samples landing in the same cell share one lookup.
const CACHE_GRID: f64 = 1000.0;

/// The network seam of the POI client. Production uses
/// [`HttpTransport`]; tests substitute a counting fake.
#[async_trait]
pub trait OverpassTransport: Send + Sync {
    async fn run_query(&self, query: &str) -> Result<OverpassResponse, OverpassError>;
}

/// POSTs Overpass QL to an interpreter endpoint with a bounded
/// timeout. A timeout surfaces as a plain request failure.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, OverpassError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl OverpassTransport for HttpTransport {
    async fn run_query(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OverpassError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Fuel-station lookup with per-run memoization. One instance per
/// enrichment run; entries are never evicted within a run.
pub struct PoiClient<T> {
    transport: T,
    cache: HashMap<(i64, i64), Vec<FuelStation>>,
}

impl<T: OverpassTransport> PoiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: HashMap::new(),
        }
    }

    /// Nearest fuel stations around `center`, closest first, at most
    /// [`MAX_STATIONS_PER_SAMPLE`]. Lookup failures are logged and
    /// reported as "no stations"; only successful responses (including
    /// legitimately empty ones) enter the cache.
    pub async fn find(&mut self, center: &GeoPoint, radius_m: f64) -> Vec<FuelStation> {
        let key = quantize(center);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("fuel station cache hit for cell {:?}", key);
            return cached.clone();
        }

        match self.query(center, radius_m).await {
            Ok(stations) => {
                self.cache.insert(key, stations.clone());
                stations
            }
            Err(e) => {
                log::warn!(
                    "fuel station lookup near {:.3},{:.3} failed: {}",
                    center.latitude,
                    center.longitude,
                    e
                );
                Vec::new()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    async fn query(
        &self,
        center: &GeoPoint,
        radius_m: f64,
    ) -> Result<Vec<FuelStation>, OverpassError> {
        let response = self
            .transport
            .run_query(&fuel_query(center, radius_m))
            .await?;

        let mut stations: Vec<FuelStation> = response
            .elements
            .iter()
            .filter(|e| e.tag("amenity") == Some("fuel"))
            .filter_map(|e| station_from_element(e, center))
            .filter(|s| s.straight_line_distance_m <= radius_m)
            .collect();

        stations.sort_by(|a, b| {
            a.straight_line_distance_m
                .total_cmp(&b.straight_line_distance_m)
        });
        stations.truncate(MAX_STATIONS_PER_SAMPLE);

        Ok(stations)
    }
}

fn fuel_query(center: &GeoPoint, radius_m: f64) -> String {
    format!(
        "[out:json][timeout:25];\
         (node[\"amenity\"=\"fuel\"](around:{radius},{lat},{lon});\
          way[\"amenity\"=\"fuel\"](around:{radius},{lat},{lon}););\
         out center;",
        radius = radius_m,
        lat = center.latitude,
        lon = center.longitude,
    )
}

fn quantize(center: &GeoPoint) -> (i64, i64) {
    (
        (center.latitude * CACHE_GRID).round() as i64,
        (center.longitude * CACHE_GRID).round() as i64,
    )
}

/// Turn an element into a candidate. Elements without a resolvable
/// coordinate are discarded.
fn station_from_element(element: &OverpassElement, center: &GeoPoint) -> Option<FuelStation> {
    let (lat, lon) = element.coordinate()?;
    let location = GeoPoint::new(lat, lon, 0.0);

    let name_tag = element.tag("name");
    let brand_tag = element.tag("brand");

    Some(FuelStation {
        id: format!("{}/{}", element.kind, element.id),
        name: name_tag.or(brand_tag).unwrap_or("Fuel station").to_string(),
        brand: brand_tag.or(name_tag).unwrap_or("Fuel station").to_string(),
        straight_line_distance_m: geo::distance(center, &location),
        location,
    })
}
