/// A single geographic point. Elevation defaults to 0 when the source
/// data carries none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

/// A contiguous run of points. Insertion order is traversal order.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    pub points: Vec<GeoPoint>,
}

/// A named route made of one or more segments.
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    /// Points of the first segment, the one the enrichment pipeline
    /// operates on.
    pub fn primary_points(&self) -> &[GeoPoint] {
        self.segments
            .first()
            .map(|s| s.points.as_slice())
            .unwrap_or(&[])
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }
}
