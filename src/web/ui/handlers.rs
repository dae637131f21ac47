use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};

use crate::web::api::enrich::{gpx_download, process_document};
use crate::web::api::error::ApiError;
use crate::web::server::AppState;

use super::templates::IndexTemplate;

pub async fn index(State(_state): State<AppState>) -> impl IntoResponse {
    IndexTemplate {}
}

/// Browser upload form target. Expects a multipart field named `gpx`
/// and answers with the enriched document as a download.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadUpload(e.to_string()))?
    {
        if field.name() != Some("gpx") {
            continue;
        }
        let xml = field
            .text()
            .await
            .map_err(|e| ApiError::BadUpload(e.to_string()))?;
        let (filename, gpx) = process_document(&state, &xml).await?;
        return Ok(gpx_download(&filename, gpx));
    }

    Err(ApiError::BadUpload("missing 'gpx' file field".to_string()))
}
