//! Application services: brand and car mutations, search, report and import.

pub mod brand_service;
pub mod car_service;
pub mod dto;
pub mod error;
pub mod importer;
pub mod report;
pub mod validation;

pub use brand_service::BrandService;
pub use car_service::{CarPolicy, CarService};
pub use error::{ServiceError, ServiceResult};
