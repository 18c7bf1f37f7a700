use crate::app::dto::{BrandRequest, BrandResponse};
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::validation::validate_request;
use crate::domain::model::BrandDraft;
use crate::storage::InventoryStore;
use std::sync::Arc;
use tracing::info;

/// Brand mutations. Names are unique (case-sensitive) and deleting a brand
/// takes its cars with it.
pub struct BrandService {
    store: Arc<dyn InventoryStore>,
}

fn draft(request: BrandRequest) -> BrandDraft {
    BrandDraft {
        name: request.name,
        country: request.country,
    }
}

impl BrandService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<BrandResponse>> {
        let brands = self.store.list_brands().await?;
        Ok(brands.into_iter().map(BrandResponse::from).collect())
    }

    pub async fn create(&self, request: BrandRequest) -> ServiceResult<BrandResponse> {
        validate_request(&request)?;
        if self.store.brand_name_exists(&request.name).await? {
            return Err(ServiceError::DuplicateBrand(request.name));
        }
        let brand = self.store.insert_brand(draft(request)).await?;
        info!(brand_id = brand.id, name = %brand.name, "brand created");
        Ok(brand.into())
    }

    pub async fn update(&self, id: i64, request: BrandRequest) -> ServiceResult<BrandResponse> {
        validate_request(&request)?;
        let current = self
            .store
            .find_brand(id)
            .await?
            .ok_or_else(|| ServiceError::brand_not_found(id))?;

        // Keeping the current name is never a collision.
        if current.name != request.name {
            if let Some(other) = self.store.find_brand_by_name(&request.name).await? {
                if other.id != id {
                    return Err(ServiceError::DuplicateBrand(request.name));
                }
            }
        }

        let brand = self
            .store
            .update_brand(id, draft(request))
            .await?
            .ok_or_else(|| ServiceError::brand_not_found(id))?;
        info!(brand_id = id, "brand updated");
        Ok(brand.into())
    }

    /// Brand row and owned cars go in one store operation.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let cars = self
            .store
            .delete_brand_cascade(id)
            .await?
            .ok_or_else(|| ServiceError::brand_not_found(id))?;
        info!(brand_id = id, cars_removed = cars, "brand deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CarDraft;
    use crate::storage::faulty::FaultyStore;
    use crate::storage::{MemoryStore, StoreError};

    fn request(name: &str, country: &str) -> BrandRequest {
        BrandRequest {
            name: name.to_string(),
            country: country.to_string(),
        }
    }

    fn service() -> (BrandService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (BrandService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_even_with_other_country() {
        let (service, _) = service();
        service.create(request("Toyota", "Japan")).await.unwrap();
        let err = service.create(request("Toyota", "USA")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateBrand(name) if name == "Toyota"));
    }

    #[tokio::test]
    async fn name_match_is_case_sensitive() {
        let (service, _) = service();
        service.create(request("Toyota", "Japan")).await.unwrap();
        assert!(service.create(request("toyota", "Japan")).await.is_ok());
    }

    #[tokio::test]
    async fn update_may_keep_its_own_name() {
        let (service, _) = service();
        let brand = service.create(request("Honda", "Japan")).await.unwrap();
        let updated = service
            .update(brand.id, request("Honda", "USA"))
            .await
            .unwrap();
        assert_eq!(updated.country, "USA");
        assert_eq!(updated.id, brand.id);
    }

    #[tokio::test]
    async fn update_cannot_take_another_brands_name() {
        let (service, store) = service();
        service.create(request("Honda", "Japan")).await.unwrap();
        let bmw = service.create(request("BMW", "Germany")).await.unwrap();
        let err = service
            .update(bmw.id, request("Honda", "Germany"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateBrand(_)));
        let stored = store.find_brand(bmw.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "BMW");
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_brand_are_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.update(42, request("Audi", "Germany")).await,
            Err(ServiceError::NotFound { resource: "Brand", id: 42 })
        ));
        assert!(matches!(
            service.delete(42).await,
            Err(ServiceError::NotFound { resource: "Brand", id: 42 })
        ));
    }

    #[tokio::test]
    async fn delete_cascades_to_cars() {
        let (service, store) = service();
        let brand = service.create(request("Fiat", "Italy")).await.unwrap();
        let mut car_ids = Vec::new();
        for model in ["Panda", "500", "Tipo"] {
            let car = store
                .insert_car(CarDraft {
                    model: model.to_string(),
                    year: 2020,
                    color: "Red".to_string(),
                    price: 10_000.0,
                    brand_id: Some(brand.id),
                })
                .await
                .unwrap();
            car_ids.push(car.id);
        }

        service.delete(brand.id).await.unwrap();

        for id in car_ids {
            assert!(store.find_car(id).await.unwrap().is_none());
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_fields_fail_validation() {
        let (service, _) = service();
        let err = service.create(request(" ", "")).await.unwrap_err();
        match err {
            ServiceError::Validation(list) => assert_eq!(
                list,
                vec![
                    "country: Country is required".to_string(),
                    "name: Name is required".to_string()
                ]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_delete_keeps_brand_and_cars() {
        let store = Arc::new(FaultyStore {
            fail_brand_delete: true,
            ..FaultyStore::default()
        });
        let service = BrandService::new(store.clone());
        let brand = service.create(request("Opel", "Germany")).await.unwrap();
        let car = store
            .insert_car(CarDraft {
                model: "Astra".to_string(),
                year: 2019,
                color: "Silver".to_string(),
                price: 15_000.0,
                brand_id: Some(brand.id),
            })
            .await
            .unwrap();

        let err = service.delete(brand.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Corrupt(_))));
        assert!(store.brand_exists(brand.id).await.unwrap());
        assert!(store.find_car(car.id).await.unwrap().is_some());
        assert_eq!(store.count_cars().await.unwrap(), 1);
    }
}
