use crate::domain::model::Brand;
use serde::{Deserialize, Serialize};

/// A car as loaded from the store, joined with the brand it belongs to.
///
/// `brand` is only `None` for rows written around the service layer; every
/// car created through the API references an existing brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
    pub brand: Option<Brand>,
}

impl Car {
    pub fn brand_id(&self) -> Option<i64> {
        self.brand.as_ref().map(|b| b.id)
    }

    /// Brand name for display; empty when the car has no brand.
    pub fn brand_name(&self) -> &str {
        self.brand.as_ref().map(|b| b.name.as_str()).unwrap_or("")
    }
}

/// Field values for inserting or overwriting a car.
#[derive(Debug, Clone, PartialEq)]
pub struct CarDraft {
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: f64,
    /// `None` only when bypassing the service layer (the store accepts it).
    pub brand_id: Option<i64>,
}
