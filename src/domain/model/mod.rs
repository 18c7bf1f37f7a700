//! Inventory entities: brands and the cars they own.

pub mod brand;
pub mod car;

pub use brand::{Brand, BrandDraft};
pub use car::{Car, CarDraft};
