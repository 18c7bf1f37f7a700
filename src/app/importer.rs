//! Bulk car import from an uploaded JSON array.
//!
//! Decoding is all-or-nothing: a malformed payload aborts with
//! [`ServiceError::Upload`] and no tally. After that every record is handled
//! on its own; a bad record is counted as failed and the rest carry on.
//! Records already written stay written.

use crate::app::dto::CarRequest;
use crate::app::error::ServiceError;
use crate::app::validation::{check_car, violations, YearRange};
use crate::storage::InventoryStore;
use tracing::{debug, warn};

pub const IMPORT_COMPLETED: &str = "Import completed";

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    MissingBrandId,
    UnknownBrand(i64),
    Invalid(Vec<String>),
    /// The store failed while checking or writing this record.
    Store(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Imported { car_id: i64 },
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportTally {
    pub successful: u32,
    pub failed: u32,
}

impl ImportTally {
    pub fn record(mut self, outcome: &RecordOutcome) -> Self {
        match outcome {
            RecordOutcome::Imported { .. } => self.successful += 1,
            RecordOutcome::Rejected(_) => self.failed += 1,
        }
        self
    }

    pub fn total(&self) -> u32 {
        self.successful + self.failed
    }
}

pub fn decode(payload: &[u8]) -> Result<Vec<CarRequest>, ServiceError> {
    serde_json::from_slice(payload)
        .map_err(|e| ServiceError::Upload(format!("Failed to process upload file: {}", e)))
}

/// Brand check first, then field validation, then the write.
pub async fn import_record(
    store: &dyn InventoryStore,
    record: &CarRequest,
    years: Option<YearRange>,
) -> RecordOutcome {
    let Some(brand_id) = record.brand_id else {
        return RecordOutcome::Rejected(RejectReason::MissingBrandId);
    };
    match store.brand_exists(brand_id).await {
        Ok(true) => {}
        Ok(false) => return RecordOutcome::Rejected(RejectReason::UnknownBrand(brand_id)),
        Err(e) => return RecordOutcome::Rejected(RejectReason::Store(e.to_string())),
    }
    if let Err(errors) = check_car(record, years) {
        return RecordOutcome::Rejected(RejectReason::Invalid(violations(&errors)));
    }
    match store.insert_car(record.to_draft(brand_id)).await {
        Ok(car) => RecordOutcome::Imported { car_id: car.id },
        Err(e) => RecordOutcome::Rejected(RejectReason::Store(e.to_string())),
    }
}

/// Decodes `payload` and imports every record in order.
pub async fn run(
    store: &dyn InventoryStore,
    payload: &[u8],
    years: Option<YearRange>,
) -> Result<ImportTally, ServiceError> {
    let records = decode(payload)?;
    let mut tally = ImportTally::default();
    for (index, record) in records.iter().enumerate() {
        let outcome = import_record(store, record, years).await;
        match &outcome {
            RecordOutcome::Imported { car_id } => debug!(index, car_id, "record imported"),
            RecordOutcome::Rejected(reason) => warn!(index, ?reason, "record rejected"),
        }
        tally = tally.record(&outcome);
    }
    Ok(tally)
}
