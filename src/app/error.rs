use crate::storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// One `"field: message"` entry per violated constraint.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{resource} not found with ID: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("A brand with name {0} already exists.")]
    DuplicateBrand(String),

    /// The bulk upload payload could not be read or decoded.
    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Report(String),

    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl ServiceError {
    pub fn brand_not_found(id: i64) -> Self {
        ServiceError::NotFound {
            resource: "Brand",
            id,
        }
    }

    pub fn car_not_found(id: i64) -> Self {
        ServiceError::NotFound { resource: "Car", id }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingBrand(id) => ServiceError::brand_not_found(id),
            StoreError::DuplicateBrandName(name) => ServiceError::DuplicateBrand(name),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
