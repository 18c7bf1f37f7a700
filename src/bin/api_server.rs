// src/bin/api_server.rs

use car_inventory::infra::logging;
use car_inventory::transport;
use car_inventory::{open_store, ChannelNotifier, Settings};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    // --- Configuration ---
    let settings = Settings::from_env()?;
    info!(
        bind_addr = %settings.bind_addr,
        min_year = settings.year_range.min,
        max_year = settings.year_range.max,
        import_year_check = settings.enforce_year_range_on_import,
        "configuration loaded"
    );

    // --- Store + notifications ---
    let store = open_store(settings.database_url.as_deref(), settings.max_connections).await?;
    let (notifier, _dispatcher) = ChannelNotifier::spawn_logging();

    let app_state =
        transport::http::AppState::new(store, Arc::new(notifier), settings.car_policy());

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!("API server listening on http://{}", settings.bind_addr);
    info!("Swagger UI available at http://{}/swagger-ui", settings.bind_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
