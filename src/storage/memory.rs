//! In-memory store backed by ordered maps behind a single async lock.

use crate::domain::model::{Brand, BrandDraft, Car, CarDraft};
use crate::domain::query::{CarFilter, PageRequest};
use crate::storage::{InventoryStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CarRow {
    model: String,
    year: i32,
    color: String,
    price: f64,
    brand_id: Option<i64>,
}

impl From<CarDraft> for CarRow {
    fn from(draft: CarDraft) -> Self {
        Self {
            model: draft.model,
            year: draft.year,
            color: draft.color,
            price: draft.price,
            brand_id: draft.brand_id,
        }
    }
}

#[derive(Default)]
struct Tables {
    brands: BTreeMap<i64, Brand>,
    cars: BTreeMap<i64, CarRow>,
    next_brand_id: i64,
    next_car_id: i64,
}

impl Tables {
    fn join(&self, id: i64, row: &CarRow) -> Car {
        Car {
            id,
            model: row.model.clone(),
            year: row.year,
            color: row.color.clone(),
            price: row.price,
            brand: row.brand_id.and_then(|b| self.brands.get(&b).cloned()),
        }
    }

    /// Mirrors the unique index on `brand.name`.
    fn check_name(&self, owner: Option<i64>, name: &str) -> StoreResult<()> {
        match self.brands.values().find(|b| b.name == name) {
            Some(other) if Some(other.id) != owner => {
                Err(StoreError::DuplicateBrandName(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check_brand(&self, brand_id: Option<i64>) -> StoreResult<()> {
        match brand_id {
            Some(id) if !self.brands.contains_key(&id) => Err(StoreError::MissingBrand(id)),
            _ => Ok(()),
        }
    }
}

/// Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        let tables = self.tables.read().await;
        Ok(tables.brands.values().cloned().collect())
    }

    async fn find_brand(&self, id: i64) -> StoreResult<Option<Brand>> {
        Ok(self.tables.read().await.brands.get(&id).cloned())
    }

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>> {
        let tables = self.tables.read().await;
        Ok(tables.brands.values().find(|b| b.name == name).cloned())
    }

    async fn brand_exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.read().await.brands.contains_key(&id))
    }

    async fn brand_name_exists(&self, name: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.brands.values().any(|b| b.name == name))
    }

    async fn insert_brand(&self, draft: BrandDraft) -> StoreResult<Brand> {
        let mut tables = self.tables.write().await;
        tables.check_name(None, &draft.name)?;
        tables.next_brand_id += 1;
        let brand = Brand::from_draft(tables.next_brand_id, draft);
        tables.brands.insert(brand.id, brand.clone());
        Ok(brand)
    }

    async fn update_brand(&self, id: i64, draft: BrandDraft) -> StoreResult<Option<Brand>> {
        let mut tables = self.tables.write().await;
        if tables.brands.contains_key(&id) {
            tables.check_name(Some(id), &draft.name)?;
        }
        Ok(tables.brands.get_mut(&id).map(|brand| {
            brand.name = draft.name;
            brand.country = draft.country;
            brand.clone()
        }))
    }

    async fn delete_brand_cascade(&self, id: i64) -> StoreResult<Option<u64>> {
        let mut tables = self.tables.write().await;
        if tables.brands.remove(&id).is_none() {
            return Ok(None);
        }
        let before = tables.cars.len();
        tables.cars.retain(|_, row| row.brand_id != Some(id));
        Ok(Some((before - tables.cars.len()) as u64))
    }

    async fn find_car(&self, id: i64) -> StoreResult<Option<Car>> {
        let tables = self.tables.read().await;
        Ok(tables.cars.get(&id).map(|row| tables.join(id, row)))
    }

    async fn car_exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.read().await.cars.contains_key(&id))
    }

    async fn insert_car(&self, draft: CarDraft) -> StoreResult<Car> {
        let mut tables = self.tables.write().await;
        tables.check_brand(draft.brand_id)?;
        tables.next_car_id += 1;
        let id = tables.next_car_id;
        let row = CarRow::from(draft);
        let car = tables.join(id, &row);
        tables.cars.insert(id, row);
        Ok(car)
    }

    async fn update_car(&self, id: i64, draft: CarDraft) -> StoreResult<Option<Car>> {
        let mut tables = self.tables.write().await;
        if !tables.cars.contains_key(&id) {
            return Ok(None);
        }
        tables.check_brand(draft.brand_id)?;
        let row = CarRow::from(draft);
        let car = tables.join(id, &row);
        tables.cars.insert(id, row);
        Ok(Some(car))
    }

    async fn delete_car(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.cars.remove(&id).is_some())
    }

    async fn find_cars(
        &self,
        filter: &CarFilter,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<Car>, u64)> {
        let tables = self.tables.read().await;
        let matching: Vec<Car> = tables
            .cars
            .iter()
            .map(|(id, row)| tables.join(*id, row))
            .filter(|car| filter.matches(car))
            .collect();
        let total = matching.len() as u64;
        let items = match page {
            Some(request) => {
                let window = request.window(matching.len());
                matching[window].to_vec()
            }
            None => matching,
        };
        Ok((items, total))
    }

    async fn count_cars(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.cars.len() as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::CarClause;

    fn draft(price: f64, brand_id: Option<i64>) -> CarDraft {
        CarDraft {
            model: "Model".to_string(),
            year: 2020,
            color: "Black".to_string(),
            price,
            brand_id,
        }
    }

    async fn brand(store: &MemoryStore, name: &str) -> Brand {
        store
            .insert_brand(BrandDraft {
                name: name.to_string(),
                country: "Germany".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order() {
        let store = MemoryStore::new();
        let a = brand(&store, "Audi").await;
        let b = brand(&store, "BMW").await;
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.delete_brand_cascade(b.id).await.unwrap(), Some(0));
        let c = brand(&store, "Opel").await;
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn insert_car_rejects_unknown_brand() {
        let store = MemoryStore::new();
        let err = store.insert_car(draft(1.0, Some(42))).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingBrand(42)));
        assert_eq!(store.count_cars().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn car_without_brand_can_be_stored_directly() {
        let store = MemoryStore::new();
        let car = store.insert_car(draft(1.0, None)).await.unwrap();
        assert!(car.brand.is_none());
        assert!(store.car_exists(car.id).await.unwrap());
    }

    #[tokio::test]
    async fn failed_update_leaves_row_untouched() {
        let store = MemoryStore::new();
        let audi = brand(&store, "Audi").await;
        let car = store.insert_car(draft(100.0, Some(audi.id))).await.unwrap();

        let err = store
            .update_car(car.id, draft(999.0, Some(audi.id + 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingBrand(_)));
        let reloaded = store.find_car(car.id).await.unwrap().unwrap();
        assert_eq!(reloaded, car);
    }

    #[tokio::test]
    async fn find_cars_pages_in_id_order() {
        let store = MemoryStore::new();
        let audi = brand(&store, "Audi").await;
        for i in 0..5 {
            store
                .insert_car(draft(1000.0 * (i + 1) as f64, Some(audi.id)))
                .await
                .unwrap();
        }
        let (items, total) = store
            .find_cars(&CarFilter::match_all(), Some(PageRequest::new(1, 2)))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3, 4]);

        let filter = CarFilter::match_all().and(CarClause::PriceAtLeast(4000.0));
        let (items, total) = store.find_cars(&filter, None).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn cascade_delete_only_touches_that_brand() {
        let store = MemoryStore::new();
        let audi = brand(&store, "Audi").await;
        let bmw = brand(&store, "BMW").await;
        store.insert_car(draft(1.0, Some(audi.id))).await.unwrap();
        store.insert_car(draft(2.0, Some(audi.id))).await.unwrap();
        store.insert_car(draft(3.0, Some(bmw.id))).await.unwrap();

        assert_eq!(store.delete_brand_cascade(audi.id).await.unwrap(), Some(2));
        assert_eq!(store.count_cars().await.unwrap(), 1);
        assert!(!store.brand_exists(audi.id).await.unwrap());
        assert!(store.brand_exists(bmw.id).await.unwrap());
    }

    #[tokio::test]
    async fn cascade_delete_of_missing_brand_touches_nothing() {
        let store = MemoryStore::new();
        let audi = brand(&store, "Audi").await;
        store.insert_car(draft(1.0, Some(audi.id))).await.unwrap();
        store.insert_car(draft(2.0, None)).await.unwrap();

        assert_eq!(store.delete_brand_cascade(audi.id + 1).await.unwrap(), None);
        assert_eq!(store.count_cars().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn brand_names_stay_unique() {
        let store = MemoryStore::new();
        let audi = brand(&store, "Audi").await;
        let bmw = brand(&store, "BMW").await;
        let dup = store
            .insert_brand(BrandDraft {
                name: "Audi".to_string(),
                country: "Italy".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(dup, StoreError::DuplicateBrandName(_)));

        let renamed = store
            .update_brand(
                audi.id,
                BrandDraft {
                    name: "Audi".to_string(),
                    country: "Austria".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.map(|b| b.country), Some("Austria".to_string()));

        let clash = store
            .update_brand(
                bmw.id,
                BrandDraft {
                    name: "Audi".to_string(),
                    country: "Germany".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(clash, StoreError::DuplicateBrandName(_)));
    }
}
