mod parser;
mod types;
mod writer;

pub use parser::parse_gpx;
pub use types::{GeoPoint, Segment, Track};
pub use writer::{write_gpx, WriteError};
