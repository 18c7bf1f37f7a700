//! Request and response shapes shared by the services and the HTTP layer.
//!
//! JSON field names are camelCase (`brandId`, `minPrice`, `totalPages`).

use crate::domain::model::{Brand, Car, CarDraft};
use crate::domain::query::{CarCriteria, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate, ToSchema)]
pub struct BrandRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 50, message = "Name must not exceed 50 characters")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Country is required"),
        length(max = 50, message = "Country must not exceed 50 characters")
    )]
    pub country: String,
}

/// Car create/update body. Also the shape of one bulk-import record.
#[derive(Deserialize, Serialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Model cannot be empty"))]
    pub model: String,
    #[validate(required(message = "Year is required"))]
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Color cannot be empty"))]
    pub color: String,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: f64,
    #[validate(required(message = "Brand id cannot be null"))]
    pub brand_id: Option<i64>,
}

impl CarRequest {
    /// Field values for the store. Only meaningful after validation passed.
    pub fn to_draft(&self, brand_id: i64) -> CarDraft {
        CarDraft {
            model: self.model.clone(),
            year: self.year.unwrap_or_default(),
            color: self.color.clone(),
            price: self.price,
            brand_id: Some(brand_id),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarSearchRequest {
    pub brand_id: Option<i64>,
    #[validate(range(min = 0.0, message = "The minimum price must be non-negative"))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0, message = "The maximum price must be non-negative"))]
    pub max_price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Page number must be non-negative"))]
    pub page: i64,
    #[serde(default)]
    #[validate(range(min = 1, message = "Page size must be at least 1"))]
    pub size: i64,
}

impl CarSearchRequest {
    pub fn criteria(&self) -> CarCriteria {
        CarCriteria {
            brand_id: self.brand_id,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        let clamp = |v: i64| v.clamp(0, u32::MAX as i64) as u32;
        PageRequest::new(clamp(self.page), clamp(self.size))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct BrandResponse {
    pub id: i64,
    pub name: String,
    pub country: String,
}

impl From<Brand> for BrandResponse {
    fn from(brand: Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name,
            country: brand.country,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CarResponse {
    pub id: i64,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
    /// `null` only for cars stored without a brand.
    pub brand: Option<BrandResponse>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            model: car.model,
            year: car.year,
            color: car.color,
            price: car.price,
            brand: car.brand.map(BrandResponse::from),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarListResponse {
    pub items: Vec<CarResponse>,
    pub total_pages: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct UploadResponse {
    pub successful: u32,
    pub failed: u32,
    pub message: String,
}

impl UploadResponse {
    pub fn rejected(message: &str) -> Self {
        Self {
            successful: 0,
            failed: 0,
            message: message.to_string(),
        }
    }
}
