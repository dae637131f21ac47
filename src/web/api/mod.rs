pub mod enrich;
pub mod error;
