use crate::app::dto::{CarListResponse, CarRequest, CarResponse, CarSearchRequest, UploadResponse};
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::importer::{self, ImportTally, IMPORT_COMPLETED};
use crate::app::report;
use crate::app::validation::{validate_car, validate_request, YearRange};
use crate::domain::model::Car;
use crate::domain::query::{CarFilter, Page};
use crate::infra::notify::{Notification, Notifier};
use crate::storage::InventoryStore;
use std::sync::Arc;
use tracing::info;

pub const IMPORT_NOTIFICATION_SUBJECT: &str = "Car import completed";

/// Knobs for the car rules that are configurable per deployment.
#[derive(Debug, Clone, Default)]
pub struct CarPolicy {
    /// Applied to create and update requests.
    pub year_range: YearRange,
    /// Also apply `year_range` to bulk-import records.
    pub enforce_year_range_on_import: bool,
    /// Who hears about finished imports. `None` disables the notification.
    pub import_report_recipient: Option<String>,
}

pub struct CarService {
    store: Arc<dyn InventoryStore>,
    notifier: Arc<dyn Notifier>,
    policy: CarPolicy,
}

impl CarService {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        notifier: Arc<dyn Notifier>,
        policy: CarPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            policy,
        }
    }

    fn required_brand(request: &CarRequest) -> ServiceResult<i64> {
        // validate_car already rejects a missing brand id.
        request.brand_id.ok_or_else(|| {
            ServiceError::Validation(vec!["brandId: Brand id cannot be null".to_string()])
        })
    }

    pub async fn create(&self, request: CarRequest) -> ServiceResult<CarResponse> {
        validate_car(&request, Some(self.policy.year_range))?;
        let brand_id = Self::required_brand(&request)?;
        if !self.store.brand_exists(brand_id).await? {
            return Err(ServiceError::brand_not_found(brand_id));
        }
        let car = self.store.insert_car(request.to_draft(brand_id)).await?;
        info!(car_id = car.id, brand_id, "car created");
        Ok(car.into())
    }

    pub async fn get(&self, id: i64) -> ServiceResult<CarResponse> {
        let car = self
            .store
            .find_car(id)
            .await?
            .ok_or_else(|| ServiceError::car_not_found(id))?;
        Ok(car.into())
    }

    /// All checks run before the single store write, so a failed update
    /// leaves the stored car untouched.
    pub async fn update(&self, id: i64, request: CarRequest) -> ServiceResult<CarResponse> {
        validate_car(&request, Some(self.policy.year_range))?;
        let brand_id = Self::required_brand(&request)?;
        if !self.store.car_exists(id).await? {
            return Err(ServiceError::car_not_found(id));
        }
        if !self.store.brand_exists(brand_id).await? {
            return Err(ServiceError::brand_not_found(brand_id));
        }
        let car = self
            .store
            .update_car(id, request.to_draft(brand_id))
            .await?
            .ok_or_else(|| ServiceError::car_not_found(id))?;
        info!(car_id = id, brand_id, "car updated");
        Ok(car.into())
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.store.delete_car(id).await? {
            return Err(ServiceError::car_not_found(id));
        }
        info!(car_id = id, "car deleted");
        Ok(())
    }

    pub async fn search(&self, request: CarSearchRequest) -> ServiceResult<CarListResponse> {
        validate_request(&request)?;
        let filter = CarFilter::from(&request.criteria());
        let page_request = request.page_request();
        let (cars, total) = self.store.find_cars(&filter, Some(page_request)).await?;
        let page = Page::new(cars, total, page_request).map(CarResponse::from);
        Ok(CarListResponse {
            items: page.items,
            total_pages: page.total_pages,
        })
    }

    /// Every car matching the request's filters. The page fields are
    /// validated like a search but do not limit the result.
    pub async fn find_all(&self, request: &CarSearchRequest) -> ServiceResult<Vec<Car>> {
        validate_request(request)?;
        let filter = CarFilter::from(&request.criteria());
        let (cars, _) = self.store.find_cars(&filter, None).await?;
        Ok(cars)
    }

    pub async fn report(&self, request: CarSearchRequest) -> ServiceResult<Vec<u8>> {
        let cars = self.find_all(&request).await?;
        let bytes = report::render(&cars)?;
        info!(rows = cars.len(), bytes = bytes.len(), "car report generated");
        Ok(bytes)
    }

    pub async fn import(&self, payload: &[u8]) -> ServiceResult<UploadResponse> {
        let years = self
            .policy
            .enforce_year_range_on_import
            .then_some(self.policy.year_range);
        let tally = importer::run(self.store.as_ref(), payload, years).await?;
        info!(
            successful = tally.successful,
            failed = tally.failed,
            "car import finished"
        );
        self.announce(&tally);
        Ok(UploadResponse {
            successful: tally.successful,
            failed: tally.failed,
            message: IMPORT_COMPLETED.to_string(),
        })
    }

    fn announce(&self, tally: &ImportTally) {
        let Some(to) = &self.policy.import_report_recipient else {
            return;
        };
        self.notifier.publish(Notification {
            to: to.clone(),
            subject: IMPORT_NOTIFICATION_SUBJECT.to_string(),
            content: format!(
                "Imported {} of {} cars ({} failed).",
                tally.successful,
                tally.total(),
                tally.failed
            ),
        });
    }
}
