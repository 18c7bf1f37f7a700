//! Persistence for brands and cars.
//!
//! Services talk to an [`InventoryStore`]; two implementations exist:
//! [`MemoryStore`] (tests, no-database mode) and [`PgStore`] (PostgreSQL via sqlx).
//! Each method is one atomic operation against the store.

#[cfg(test)]
pub mod faulty;
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::domain::model::{Brand, BrandDraft, Car, CarDraft};
use crate::domain::query::{CarFilter, PageRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write referenced a brand id that does not exist.
    #[error("brand {0} does not exist")]
    MissingBrand(i64),

    /// Unique constraint on the brand name fired (lost a race with another writer).
    #[error("brand name {0} is taken")]
    DuplicateBrandName(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// All brands, id ascending.
    async fn list_brands(&self) -> StoreResult<Vec<Brand>>;

    async fn find_brand(&self, id: i64) -> StoreResult<Option<Brand>>;

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>>;

    async fn brand_exists(&self, id: i64) -> StoreResult<bool>;

    /// Case-sensitive exact match.
    async fn brand_name_exists(&self, name: &str) -> StoreResult<bool>;

    async fn insert_brand(&self, draft: BrandDraft) -> StoreResult<Brand>;

    /// Overwrites name and country. `Ok(None)` if the id is absent.
    async fn update_brand(&self, id: i64, draft: BrandDraft) -> StoreResult<Option<Brand>>;

    /// Removes the brand and every car it owns as one unit of work.
    /// Returns how many cars went, or `Ok(None)` if the brand is absent
    /// (in which case nothing is touched).
    async fn delete_brand_cascade(&self, id: i64) -> StoreResult<Option<u64>>;

    async fn find_car(&self, id: i64) -> StoreResult<Option<Car>>;

    async fn car_exists(&self, id: i64) -> StoreResult<bool>;

    /// Fails with [`StoreError::MissingBrand`] if `draft.brand_id` does not resolve.
    async fn insert_car(&self, draft: CarDraft) -> StoreResult<Car>;

    /// Overwrites every field in one step. `Ok(None)` if the id is absent.
    async fn update_car(&self, id: i64, draft: CarDraft) -> StoreResult<Option<Car>>;

    async fn delete_car(&self, id: i64) -> StoreResult<bool>;

    /// Cars matching `filter`, ordered by id ascending, together with the
    /// total number of matches. `page = None` returns every match.
    async fn find_cars(
        &self,
        filter: &CarFilter,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<Car>, u64)>;

    async fn count_cars(&self) -> StoreResult<u64>;

    /// Cheap liveness check.
    async fn ping(&self) -> StoreResult<()>;
}

/// PostgreSQL when a URL is given, otherwise the in-memory store.
pub async fn open_store(
    database_url: Option<&str>,
    max_connections: u32,
) -> anyhow::Result<Arc<dyn InventoryStore>> {
    match database_url {
        Some(url) => {
            let store = PgStore::connect(url, max_connections).await?;
            info!(max_connections, "connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
