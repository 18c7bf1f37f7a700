use crate::app::dto::BrandRequest;
use crate::transport::http::handlers::common::json_422;
use crate::transport::http::types::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

const BRAND_SHAPE: &str = r#"{"name": "...", "country": "..."}"#;

#[utoipa::path(
    get,
    path = "/api/brand",
    responses(
        (status = 200, description = "All brands, id ascending", body = Vec<crate::app::dto::BrandResponse>),
        (status = 500, description = "Internal server error", body = String)
    )
)]
pub async fn list_brands_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.brands.list().await {
        Ok(brands) => (StatusCode::OK, Json(brands)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/brand",
    request_body = BrandRequest,
    responses(
        (status = 200, description = "Brand created", body = crate::app::dto::BrandResponse),
        (status = 400, description = "Validation failed or name already taken"),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = String)
    )
)]
pub async fn create_brand_handler(
    State(state): State<AppState>,
    request: Result<Json<BrandRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, BRAND_SHAPE),
    };
    match state.brands.create(request).await {
        Ok(brand) => (StatusCode::OK, Json(brand)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/brand/{id}",
    params(("id" = i64, Path, description = "Brand id")),
    request_body = BrandRequest,
    responses(
        (status = 200, description = "Brand updated", body = crate::app::dto::BrandResponse),
        (status = 400, description = "Validation failed or name already taken"),
        (status = 404, description = "Brand not found", body = String),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = String)
    )
)]
pub async fn update_brand_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<BrandRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, BRAND_SHAPE),
    };
    match state.brands.update(id, request).await {
        Ok(brand) => (StatusCode::OK, Json(brand)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/brand/{id}",
    params(("id" = i64, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand and its cars deleted", body = String),
        (status = 404, description = "Brand not found", body = String)
    )
)]
pub async fn delete_brand_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.brands.delete(id).await {
        Ok(()) => (StatusCode::OK, "Brand was deleted successfully").into_response(),
        Err(e) => e.into_response(),
    }
}
