//! Car search: filter composition and pagination.

pub mod filter;
pub mod page;

pub use filter::{CarClause, CarCriteria, CarFilter};
pub use page::{total_pages, Page, PageRequest};
