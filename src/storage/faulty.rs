//! Test store that delegates to [`MemoryStore`] but fails selected writes.

use crate::domain::model::{Brand, BrandDraft, Car, CarDraft};
use crate::domain::query::{CarFilter, PageRequest};
use crate::storage::{InventoryStore, MemoryStore, StoreError, StoreResult};
use async_trait::async_trait;

#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    /// `delete_brand_cascade` fails without touching anything.
    pub fail_brand_delete: bool,
    /// `insert_car` fails for drafts with this model name.
    pub fail_insert_model: Option<&'static str>,
}

fn injected(what: &str) -> StoreError {
    StoreError::Corrupt(format!("injected failure: {}", what))
}

#[async_trait]
impl InventoryStore for FaultyStore {
    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        self.inner.list_brands().await
    }

    async fn find_brand(&self, id: i64) -> StoreResult<Option<Brand>> {
        self.inner.find_brand(id).await
    }

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>> {
        self.inner.find_brand_by_name(name).await
    }

    async fn brand_exists(&self, id: i64) -> StoreResult<bool> {
        self.inner.brand_exists(id).await
    }

    async fn brand_name_exists(&self, name: &str) -> StoreResult<bool> {
        self.inner.brand_name_exists(name).await
    }

    async fn insert_brand(&self, draft: BrandDraft) -> StoreResult<Brand> {
        self.inner.insert_brand(draft).await
    }

    async fn update_brand(&self, id: i64, draft: BrandDraft) -> StoreResult<Option<Brand>> {
        self.inner.update_brand(id, draft).await
    }

    async fn delete_brand_cascade(&self, id: i64) -> StoreResult<Option<u64>> {
        if self.fail_brand_delete {
            return Err(injected("delete_brand_cascade"));
        }
        self.inner.delete_brand_cascade(id).await
    }

    async fn find_car(&self, id: i64) -> StoreResult<Option<Car>> {
        self.inner.find_car(id).await
    }

    async fn car_exists(&self, id: i64) -> StoreResult<bool> {
        self.inner.car_exists(id).await
    }

    async fn insert_car(&self, draft: CarDraft) -> StoreResult<Car> {
        if self.fail_insert_model == Some(draft.model.as_str()) {
            return Err(injected("insert_car"));
        }
        self.inner.insert_car(draft).await
    }

    async fn update_car(&self, id: i64, draft: CarDraft) -> StoreResult<Option<Car>> {
        self.inner.update_car(id, draft).await
    }

    async fn delete_car(&self, id: i64) -> StoreResult<bool> {
        self.inner.delete_car(id).await
    }

    async fn find_cars(
        &self,
        filter: &CarFilter,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<Car>, u64)> {
        self.inner.find_cars(filter, page).await
    }

    async fn count_cars(&self) -> StoreResult<u64> {
        self.inner.count_cars().await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}
