use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("track contains no usable route points")]
    NoRouteData,
}
