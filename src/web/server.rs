use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::overpass::HttpTransport;

use super::api::enrich as enrich_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::ui::handlers as ui_handlers;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub transport: HttpTransport,
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let timeout = config
        .overpass
        .timeout_duration()
        .map_err(std::io::Error::other)?;
    let transport = HttpTransport::new(&config.overpass.url, timeout)
        .map_err(std::io::Error::other)?;

    let state = AppState {
        config: Arc::new(config),
        transport,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // UI routes
        .route("/", get(ui_handlers::index))
        .route("/enrich", post(ui_handlers::upload))
        // API endpoints
        .route("/api/enrich", post(enrich_handlers::enrich))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
