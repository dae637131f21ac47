use thiserror::Error;

/// Failures at the Overpass boundary. These never leave the POI
/// client: `find` absorbs them into an empty candidate list.
#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
}
