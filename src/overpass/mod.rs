mod client;
mod error;
mod types;

pub use client::{HttpTransport, OverpassTransport, PoiClient, MAX_STATIONS_PER_SAMPLE};
pub use error::OverpassError;
pub use types::{OverpassCenter, OverpassElement, OverpassResponse};

#[cfg(test)]
pub(crate) use client::tests as client_tests;
