use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::enrich::{enrich_track, EnrichError};
use crate::gpx::{parse_gpx, write_gpx};
use crate::overpass::PoiClient;
use crate::web::server::AppState;

use super::error::{ApiError, ApiResult};

/// Parse, enrich and re-render one GPX document. Shared by the raw
/// API endpoint and the form upload handler. Each call owns a fresh
/// POI client, so lookup caching never leaks across requests.
pub(crate) async fn process_document(
    state: &AppState,
    xml: &str,
) -> Result<(String, String), ApiError> {
    let mut tracks = parse_gpx(xml);
    if tracks.len() > 1 {
        log::info!("document has {} tracks, enriching the first", tracks.len());
    }
    let track = match tracks.drain(..).next() {
        Some(t) => t,
        None => return Err(ApiError::NoRouteData),
    };
    log::debug!("parsed '{}' with {} points", track.name, track.point_count());

    let mut client = PoiClient::new(state.transport.clone());
    let options = state.config.enrich.to_options();
    let stations = enrich_track(&track, &mut client, &options)
        .await
        .map_err(|e| match e {
            EnrichError::NoRouteData => ApiError::NoRouteData,
        })?;

    log::info!("'{}': {} fuel stops found", track.name, stations.len());

    let filename = format!("{}-fuelstops.gpx", slug(&track.name));
    let gpx = write_gpx(&track, &stations)?;
    Ok((filename, gpx))
}

pub(crate) fn gpx_download(filename: &str, gpx: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/gpx+xml".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        gpx,
    )
        .into_response()
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            previous_dash = false;
        } else if !previous_dash {
            out.push('-');
            previous_dash = true;
        }
    }
    let out = out.trim_end_matches('-').to_string();
    if out.is_empty() {
        "route".to_string()
    } else {
        out
    }
}

#[utoipa::path(
    post,
    path = "/api/enrich",
    request_body(
        content = String,
        content_type = "application/gpx+xml",
        description = "GPX document to annotate with fuel stop waypoints"
    ),
    responses(
        (status = 200, description = "Enriched GPX document", body = String, content_type = "application/gpx+xml"),
        (status = 400, description = "No usable route data", body = super::error::ErrorResponse)
    ),
    tag = "enrich"
)]
pub async fn enrich(State(state): State<AppState>, body: String) -> ApiResult<Response> {
    let (filename, gpx) = process_document(&state, &body).await?;
    Ok(gpx_download(&filename, gpx))
}

#[cfg(test)]
mod tests {
    use super::slug;

    #[test]
    fn slugs_are_safe_for_filenames() {
        assert_eq!(slug("Rhein & Mosel Tour"), "rhein-mosel-tour");
        assert_eq!(slug("   "), "route");
        assert_eq!(slug("Überführung"), "berf-hrung");
    }
}
