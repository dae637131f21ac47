mod enricher;
mod error;
mod sampler;
mod types;

pub use enricher::enrich_track;
pub use error::EnrichError;
pub use sampler::sample_route;
pub use types::{EnrichOptions, EnrichedStation, FuelStation};
