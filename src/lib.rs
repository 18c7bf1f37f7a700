pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{BrandService, CarPolicy, CarService, ServiceError};
pub use domain::model::{Brand, BrandDraft, Car, CarDraft};
pub use infra::config::Settings;
pub use infra::notify::{ChannelNotifier, NoopNotifier, Notification, Notifier};
pub use storage::{open_store, InventoryStore, MemoryStore, PgStore, StoreError};
