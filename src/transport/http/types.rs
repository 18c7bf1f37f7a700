use crate::app::{BrandService, CarPolicy, CarService};
use crate::infra::notify::Notifier;
use crate::storage::InventoryStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub brands: Arc<BrandService>,
    pub cars: Arc<CarService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        notifier: Arc<dyn Notifier>,
        policy: CarPolicy,
    ) -> Self {
        Self {
            brands: Arc::new(BrandService::new(store.clone())),
            cars: Arc::new(CarService::new(store.clone(), notifier, policy)),
            store,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Multipart body of `POST /api/car/upload`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// JSON array of `{model, year, color, price, brandId}`.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
