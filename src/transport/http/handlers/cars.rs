use crate::app::dto::{CarRequest, CarSearchRequest, UploadResponse};
use crate::app::report::REPORT_FILENAME;
use crate::app::ServiceError;
use crate::transport::http::handlers::common::json_422;
use crate::transport::http::types::AppState;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

const CAR_SHAPE: &str =
    r#"{"model": "...", "year": 2024, "color": "...", "price": 1.0, "brandId": 1}"#;
const SEARCH_SHAPE: &str =
    r#"{"brandId": 1, "minPrice": 0.0, "maxPrice": 0.0, "page": 0, "size": 10}"#;

pub const UPLOAD_FIELD: &str = "file";
pub const EMPTY_FILE: &str = "Empty file provided";
pub const NO_FILE: &str = "No file provided";

#[utoipa::path(
    post,
    path = "/api/car",
    request_body = CarRequest,
    responses(
        (status = 201, description = "Car created", body = crate::app::dto::CarResponse),
        (status = 400, description = "Validation failed", body = Vec<String>),
        (status = 404, description = "Brand not found", body = String),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = String)
    )
)]
pub async fn create_car_handler(
    State(state): State<AppState>,
    request: Result<Json<CarRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, CAR_SHAPE),
    };
    match state.cars.create(request).await {
        Ok(car) => (StatusCode::CREATED, Json(car)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/car/{id}",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car with its brand", body = crate::app::dto::CarResponse),
        (status = 404, description = "Car not found", body = String)
    )
)]
pub async fn get_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.cars.get(id).await {
        Ok(car) => (StatusCode::OK, Json(car)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/car/{id}",
    params(("id" = i64, Path, description = "Car id")),
    request_body = CarRequest,
    responses(
        (status = 200, description = "Car updated", body = crate::app::dto::CarResponse),
        (status = 400, description = "Validation failed", body = Vec<String>),
        (status = 404, description = "Car or brand not found", body = String),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = String)
    )
)]
pub async fn update_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<CarRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, CAR_SHAPE),
    };
    match state.cars.update(id, request).await {
        Ok(car) => (StatusCode::OK, Json(car)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/car/{id}",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car deleted", body = String),
        (status = 404, description = "Car not found", body = String)
    )
)]
pub async fn delete_car_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.cars.delete(id).await {
        Ok(()) => (StatusCode::OK, "Car was deleted successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/car/_list",
    request_body = CarSearchRequest,
    responses(
        (status = 200, description = "One page of matching cars", body = crate::app::dto::CarListResponse),
        (status = 400, description = "Invalid criteria", body = Vec<String>),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = String)
    )
)]
pub async fn search_cars_handler(
    State(state): State<AppState>,
    request: Result<Json<CarSearchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, SEARCH_SHAPE),
    };
    match state.cars.search(request).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/car/_report",
    request_body = CarSearchRequest,
    responses(
        (status = 200, description = "CSV report of every matching car", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = String),
        (status = 500, description = "Report generation failed", body = String)
    )
)]
pub async fn report_cars_handler(
    State(state): State<AppState>,
    request: Result<Json<CarSearchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, SEARCH_SHAPE),
    };
    match state.cars.report(request).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", REPORT_FILENAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

fn bad_upload(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(UploadResponse::rejected(message))).into_response()
}

/// Pulls the bytes of the `file` part out of the form. `Ok(None)` if absent.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Vec<u8>>, ServiceError> {
    let read_error = |e: MultipartError| {
        ServiceError::Upload(format!("Failed to read upload file: {}", e.body_text()))
    };
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(read_error)?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}

#[utoipa::path(
    post,
    path = "/api/car/upload",
    request_body(content = crate::transport::http::types::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import tally", body = UploadResponse),
        (status = 400, description = "No file or an empty file", body = UploadResponse),
        (status = 500, description = "Payload could not be read or decoded", body = String)
    )
)]
pub async fn upload_cars_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e.body_text(), "upload is not a multipart form");
            return bad_upload(NO_FILE);
        }
    };
    let payload = match read_upload(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return bad_upload(NO_FILE),
        Err(e) => return e.into_response(),
    };
    if payload.is_empty() {
        return bad_upload(EMPTY_FILE);
    }
    match state.cars.import(&payload).await {
        Ok(tally) => (StatusCode::OK, Json(tally)).into_response(),
        Err(e) => e.into_response(),
    }
}
