//! Composable filter over cars.
//!
//! A [`CarFilter`] is a flat list of [`CarClause`]s combined with logical AND.
//! An empty list matches every car. The filter is plain data: the in-memory
//! store evaluates it with [`CarFilter::matches`], the PostgreSQL store renders
//! it to a `WHERE` clause with bind parameters.

use crate::domain::model::Car;

/// Optional search restrictions supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarCriteria {
    pub brand_id: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarClause {
    /// The car's brand id equals the value (join on the brand relation).
    BrandIs(i64),
    /// `price >= value`
    PriceAtLeast(f64),
    /// `price <= value`
    PriceAtMost(f64),
}

impl CarClause {
    pub fn matches(&self, car: &Car) -> bool {
        match *self {
            CarClause::BrandIs(id) => car.brand_id() == Some(id),
            CarClause::PriceAtLeast(min) => car.price >= min,
            CarClause::PriceAtMost(max) => car.price <= max,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFilter {
    clauses: Vec<CarClause>,
}

impl CarFilter {
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Maps each present criteria field to its clause. Absent fields add nothing.
    pub fn from_criteria(criteria: &CarCriteria) -> Self {
        let mut filter = Self::match_all();
        if let Some(brand_id) = criteria.brand_id {
            filter = filter.and(CarClause::BrandIs(brand_id));
        }
        if let Some(min) = criteria.min_price {
            filter = filter.and(CarClause::PriceAtLeast(min));
        }
        if let Some(max) = criteria.max_price {
            filter = filter.and(CarClause::PriceAtMost(max));
        }
        filter
    }

    pub fn and(mut self, clause: CarClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[CarClause] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, car: &Car) -> bool {
        self.clauses.iter().all(|clause| clause.matches(car))
    }
}

impl From<&CarCriteria> for CarFilter {
    fn from(criteria: &CarCriteria) -> Self {
        CarFilter::from_criteria(criteria)
    }
}
