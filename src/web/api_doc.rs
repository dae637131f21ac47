use utoipa::OpenApi;

use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(super::api::enrich::enrich),
    components(schemas(ErrorResponse)),
    info(
        title = "Fuelstop API",
        description = "Annotate cycling GPX routes with fuel stop waypoints",
        version = "0.1.0"
    ),
    tags(
        (name = "enrich", description = "Route enrichment")
    )
)]
pub struct ApiDoc;
