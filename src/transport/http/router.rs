use crate::app::dto::{
    BrandRequest, BrandResponse, CarListResponse, CarRequest, CarResponse, CarSearchRequest,
    UploadResponse,
};
use crate::transport::http::handlers::{brands, cars, health};
use crate::transport::http::types::{HealthResponse, UploadForm};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        brands::list_brands_handler,
        brands::create_brand_handler,
        brands::update_brand_handler,
        brands::delete_brand_handler,
        cars::create_car_handler,
        cars::get_car_handler,
        cars::update_car_handler,
        cars::delete_car_handler,
        cars::search_cars_handler,
        cars::report_cars_handler,
        cars::upload_cars_handler
    ),
    components(schemas(
        HealthResponse,
        BrandRequest,
        BrandResponse,
        CarRequest,
        CarResponse,
        CarSearchRequest,
        CarListResponse,
        UploadResponse,
        UploadForm
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/brand",
            get(brands::list_brands_handler).post(brands::create_brand_handler),
        )
        .route(
            "/api/brand/:id",
            put(brands::update_brand_handler).delete(brands::delete_brand_handler),
        )
        .route("/api/car", post(cars::create_car_handler))
        .route("/api/car/_list", post(cars::search_cars_handler))
        .route("/api/car/_report", post(cars::report_cars_handler))
        .route("/api/car/upload", post(cars::upload_cars_handler))
        .route(
            "/api/car/:id",
            get(cars::get_car_handler)
                .put(cars::update_car_handler)
                .delete(cars::delete_car_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
